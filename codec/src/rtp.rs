//
// Copyright 2021 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! RTP framing for voice datagrams. See https://tools.ietf.org/html/rfc3550 and
//! https://www.rfc-editor.org/rfc/rfc8285 for the one-byte header extensions
//! some senders attach.

use std::ops::{Range, RangeInclusive};

mod extension;
mod header;
mod packet;
mod types;

pub use extension::payload_start;
pub use header::Header;
pub use packet::{Datagram, Packet};
pub use types::*;

pub const VERSION: u8 = 2;
pub const RTP_HEADER_LEN: usize = 12;
/// Version 2, no padding, no extension, no CSRCs.
pub const RTP_VERSION_PAD_EXTEND: u8 = 0b1000_0000;
/// The payload type the voice gateway uses for its Opus stream.
pub const OPUS_PAYLOAD_TYPE: PayloadType = 0x78;

const RTP_EXTENSION_FLAG: u8 = 0b0001_0000;
const RTP_PAYLOAD_TYPE_OFFSET: usize = 1;
const RTP_SEQNUM_RANGE: Range<usize> = 2..4;
const RTP_TIMESTAMP_RANGE: Range<usize> = 4..8;
const RTP_SSRC_RANGE: Range<usize> = 8..12;
const RTP_ONE_BYTE_EXTENSIONS_PROFILE: u16 = 0xBEDE;
const RTCP_PAYLOAD_TYPES: RangeInclusive<u8> = 64..=95;

/// Cheap classification of a datagram arriving on the voice socket.
///
/// RTCP shares the socket, so anything claiming an RTCP payload type is not RTP.
/// Packets that are too short but have an RTP-looking prefix are accepted here and
/// rejected by the parser.
pub fn looks_like_rtp(packet: &[u8]) -> bool {
    packet.len() > RTP_PAYLOAD_TYPE_OFFSET
        && (packet[0] >> 6) == VERSION
        && !RTCP_PAYLOAD_TYPES.contains(&(packet[RTP_PAYLOAD_TYPE_OFFSET] & 0b0111_1111))
}
