//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use voice_common::{parse_u16, parse_u32, CheckedSplitAt, Writable, Writer};

use super::{
    types::*, OPUS_PAYLOAD_TYPE, RTP_HEADER_LEN, RTP_SEQNUM_RANGE, RTP_SSRC_RANGE,
    RTP_TIMESTAMP_RANGE, RTP_VERSION_PAD_EXTEND,
};
use crate::error::{Error, Result};

/// The fields of the fixed RTP header that identify a voice frame.
///
/// Parsing accepts any first two bytes; writing always produces the voice
/// protocol's fixed version byte and payload type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub sequence: SequenceNumber,
    pub timestamp: Timestamp,
    pub ssrc: Ssrc,
}

impl Header {
    pub fn new(sequence: SequenceNumber, timestamp: Timestamp, ssrc: Ssrc) -> Self {
        Self {
            sequence,
            timestamp,
            ssrc,
        }
    }

    pub fn parse(packet: &[u8]) -> Result<Self> {
        let (main_header, _rest) = packet
            .checked_split_at(RTP_HEADER_LEN)
            .ok_or_else(|| Error::malformed(packet.len(), "shorter than the fixed RTP header"))?;

        Ok(Self {
            sequence: parse_u16(&main_header[RTP_SEQNUM_RANGE]),
            timestamp: parse_u32(&main_header[RTP_TIMESTAMP_RANGE]),
            ssrc: parse_u32(&main_header[RTP_SSRC_RANGE]),
        })
    }

    pub fn to_bytes(&self) -> [u8; RTP_HEADER_LEN] {
        let mut bytes = [0u8; RTP_HEADER_LEN];
        bytes.copy_from_slice(&self.to_vec());
        bytes
    }
}

impl Writer for Header {
    fn written_len(&self) -> usize {
        RTP_HEADER_LEN
    }

    fn write(&self, out: &mut dyn Writable) {
        (
            [RTP_VERSION_PAD_EXTEND],
            [OPUS_PAYLOAD_TYPE],
            self.sequence,
            self.timestamp,
            self.ssrc,
        )
            .write(out);
    }
}

#[cfg(test)]
mod test {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_write_header() {
        let header = Header::new(1, 960, 0xDEADBEEF);
        assert_eq!(hex!("8078 0001 000003c0 deadbeef"), header.to_bytes());
        assert_eq!(header.to_bytes().to_vec(), Writer::to_vec(&header));

        let header = Header::new(u16::MAX, u32::MAX, 0);
        assert_eq!(hex!("8078 ffff ffffffff 00000000"), header.to_bytes());
    }

    #[test]
    fn test_written_len_matches_output() {
        let header = Header::new(0xABCD, 0x0102_0304, 0x0506_0708);
        let written = Writer::to_vec(&header);
        assert_eq!(header.written_len(), written.len());
        assert_eq!(hex!("8078 abcd 01020304 05060708").to_vec(), written);

        let mut packet = Vec::new();
        (header, &b"opus"[..]).write(&mut packet);
        assert_eq!(&header.to_bytes()[..], &packet[..RTP_HEADER_LEN]);
        assert_eq!(b"opus", &packet[RTP_HEADER_LEN..]);
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            Ok(Header::new(1, 960, 0xDEADBEEF)),
            Header::parse(&hex!("8078 0001 000003c0 deadbeef"))
        );

        // Flags and payload type are not checked, and trailing bytes are ignored.
        assert_eq!(
            Ok(Header::new(0x1234, 0x01020304, 0x0a0b0c0d)),
            Header::parse(&hex!("90 6f 1234 01020304 0a0b0c0d bede 0001"))
        );
    }

    #[test]
    fn test_parse_header_too_short() {
        assert_eq!(
            Err(Error::malformed(0, "shorter than the fixed RTP header")),
            Header::parse(&[])
        );
        let header = Header::new(1, 2, 3).to_bytes();
        for len in 0..RTP_HEADER_LEN {
            assert!(
                matches!(
                    Header::parse(&header[..len]),
                    Err(Error::MalformedPacket { len: l, .. }) if l == len
                ),
                "len = {len}"
            );
        }
    }
}
