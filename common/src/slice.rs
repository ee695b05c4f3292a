//
// Copyright 2022 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use std::io::{ErrorKind, Result};

/// A bounds-checked forward cursor over a byte slice.
///
/// Every read either advances past exactly the bytes it returns or fails with
/// `UnexpectedEof`, leaving the cursor where it was.
pub trait ReadSliceExt: std::io::Read {
    /// Like `std::io::read_exact`, but borrows from `self` instead.
    fn read_slice(&mut self, n: usize) -> Result<&[u8]>;

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_slice(1)?[0])
    }

    fn read_u16_be(&mut self) -> Result<u16> {
        let bytes = self.read_slice(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Advances past `n` bytes without looking at them.
    fn skip(&mut self, n: usize) -> Result<()> {
        self.read_slice(n).map(|_| ())
    }
}

impl ReadSliceExt for &'_ [u8] {
    fn read_slice(&mut self, n: usize) -> Result<&[u8]> {
        if self.len() < n {
            Err(ErrorKind::UnexpectedEof.into())
        } else {
            let (result, rest) = self.split_at(n);
            *self = rest;
            Ok(result)
        }
    }
}
