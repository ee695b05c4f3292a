//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use log::*;
use voice_common::{CheckedSplitAt, ReadSliceExt};

use super::{RTP_EXTENSION_FLAG, RTP_HEADER_LEN, RTP_ONE_BYTE_EXTENSIONS_PROFILE};
use crate::error::{Error, Result};

/// Returns the offset of the first payload byte, stepping over a one-byte
/// header extension block (RFC 8285) and the zero padding after it.
///
/// Only the 0xBEDE profile is understood. A packet with the extension flag but
/// another marker is treated as if it had no extension at all. Padding may run
/// to the end of the packet, which leaves an empty payload.
pub fn payload_start(packet: &[u8]) -> Result<usize> {
    let malformed = |reason| Error::malformed(packet.len(), reason);

    let (main_header, extension) = packet
        .checked_split_at(RTP_HEADER_LEN)
        .ok_or_else(|| malformed("shorter than the fixed RTP header"))?;
    if main_header[0] & RTP_EXTENSION_FLAG == 0 {
        return Ok(RTP_HEADER_LEN);
    }

    let mut cursor = extension;
    match cursor.read_u16_be() {
        Ok(RTP_ONE_BYTE_EXTENSIONS_PROFILE) => {}
        profile => {
            trace!(
                "extension flag set without a one-byte extension marker ({:?}); assuming no extension",
                profile.ok()
            );
            return Ok(RTP_HEADER_LEN);
        }
    }
    let extensions_len = usize::from(
        cursor
            .read_u16_be()
            .map_err(|_| malformed("missing extension length"))?,
    ) * 4;

    let mut consumed = 0;
    while consumed < extensions_len {
        let element_header = cursor
            .read_u8()
            .map_err(|_| malformed("extension element past end of packet"))?;
        let element_len = usize::from(element_header & 0b0000_1111) + 1;
        cursor
            .skip(element_len)
            .map_err(|_| malformed("extension element past end of packet"))?;
        consumed += 1 + element_len;
    }

    let padding = cursor.iter().take_while(|b| **b == 0).count();
    Ok(packet.len() - cursor.len() + padding)
}
