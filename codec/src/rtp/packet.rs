//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use std::{borrow::Borrow, fmt::Debug, net::SocketAddr, ops::Range};

use voice_common::Writer;

use super::{extension::payload_start, types::*, Header, RTP_HEADER_LEN};
use crate::error::Result;

/// An RTP voice packet: the serialized bytes plus where the payload lives in them.
///
/// Packets are immutable once built or parsed. A `Packet<&[u8]>` views a datagram
/// without copying it.
#[derive(Clone, PartialEq, Eq)]
pub struct Packet<T = Vec<u8>> {
    header: Header,
    payload_range: Range<usize>,
    serialized: T,
}

impl<T: Borrow<[u8]>> Debug for Packet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("rtp::Packet")
            .field("ssrc", &self.ssrc())
            .field("sequence", &self.sequence())
            .field("timestamp", &self.timestamp())
            .field("payload.len", &self.payload().len())
            .finish()
    }
}

impl<T: Borrow<[u8]>> Packet<T> {
    /// Parses the fixed header and locates the payload, stepping over any
    /// one-byte header extension.
    pub fn parse(serialized: T) -> Result<Self> {
        let bytes = serialized.borrow();
        let header = Header::parse(bytes)?;
        let payload_range = payload_start(bytes)?..bytes.len();
        Ok(Self {
            header,
            payload_range,
            serialized,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.header.sequence
    }

    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp
    }

    pub fn ssrc(&self) -> Ssrc {
        self.header.ssrc
    }

    pub fn serialized(&self) -> &[u8] {
        self.serialized.borrow()
    }

    /// The fixed header exactly as it appears on the wire.
    pub fn header_bytes(&self) -> &[u8] {
        &self.serialized()[..RTP_HEADER_LEN]
    }

    pub fn payload_range(&self) -> Range<usize> {
        self.payload_range.clone()
    }

    pub fn payload(&self) -> &[u8] {
        &self.serialized()[self.payload_range.clone()]
    }

    pub fn borrow(&self) -> Packet<&[u8]> {
        Packet {
            header: self.header,
            payload_range: self.payload_range.clone(),
            serialized: self.serialized(),
        }
    }

    pub fn to_owned(&self) -> Packet<Vec<u8>> {
        Packet {
            header: self.header,
            payload_range: self.payload_range.clone(),
            serialized: self.serialized().to_vec(),
        }
    }

    pub fn into_serialized(self) -> T {
        self.serialized
    }

    pub fn to_datagram(&self, destination: SocketAddr) -> Datagram<&[u8]> {
        Datagram {
            bytes: self.serialized(),
            destination,
        }
    }
}

impl Packet<Vec<u8>> {
    /// Builds a packet with a fresh fixed header and no extension.
    pub fn build(
        sequence: SequenceNumber,
        timestamp: Timestamp,
        ssrc: Ssrc,
        payload: &[u8],
    ) -> Self {
        let header = Header::new(sequence, timestamp, ssrc);
        Self::from_header_and_serialized(header, (header, payload).to_vec())
    }

    /// `serialized` must start with `header` as written by [`Header::write`].
    pub(crate) fn from_header_and_serialized(header: Header, serialized: Vec<u8>) -> Self {
        debug_assert_eq!(&header.to_bytes()[..], &serialized[..RTP_HEADER_LEN]);
        Self {
            header,
            payload_range: RTP_HEADER_LEN..serialized.len(),
            serialized,
        }
    }

    pub fn into_datagram(self, destination: SocketAddr) -> Datagram {
        Datagram {
            bytes: self.serialized,
            destination,
        }
    }
}

/// Bytes ready for the voice socket, with where they go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Datagram<T = Vec<u8>> {
    pub bytes: T,
    pub destination: SocketAddr,
}
