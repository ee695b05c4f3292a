//
// Copyright 2022 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Common functionality for parsing and writing voice packets.

mod logging;
mod serialize;
mod slice;

use std::convert::TryInto;

pub use logging::format_log_line;
pub use serialize::*;
pub use slice::*;

/// Reads a big-endian u16 from the first two bytes.
///
/// Panics if `bytes` is shorter than 2; callers split the input first.
pub fn parse_u16(bytes: &[u8]) -> u16 {
    u16::from_be_bytes(bytes[0..2].try_into().unwrap())
}

/// Reads a big-endian u32 from the first four bytes.
///
/// Panics if `bytes` is shorter than 4; callers split the input first.
pub fn parse_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes(bytes[0..4].try_into().unwrap())
}

pub trait CheckedSplitAt {
    fn checked_split_at(&self, mid: usize) -> Option<(&[u8], &[u8])>;

    /// Splits off the last `tail_len` bytes.
    fn checked_split_from_end(&self, tail_len: usize) -> Option<(&[u8], &[u8])>;
}

impl CheckedSplitAt for [u8] {
    fn checked_split_at(&self, mid: usize) -> Option<(&[u8], &[u8])> {
        if self.len() < mid {
            None
        } else {
            Some(self.split_at(mid))
        }
    }

    fn checked_split_from_end(&self, tail_len: usize) -> Option<(&[u8], &[u8])> {
        let mid = self.len().checked_sub(tail_len)?;
        Some(self.split_at(mid))
    }
}
