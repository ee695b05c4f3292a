//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use thiserror::Error;

use crate::crypto::EncryptionMode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The datagram can't be an RTP packet: it is shorter than the fixed header, or
    /// the header extension (or nonce suffix) runs past the end of the buffer.
    #[error("malformed RTP packet ({len} bytes): {reason}")]
    MalformedPacket { len: usize, reason: &'static str },

    #[error("unsupported encryption mode: {0:?}")]
    UnsupportedEncryptionMode(String),

    #[error("failed to authenticate and decrypt audio payload")]
    DecryptionAuthFailure,

    #[error("secret key must be 32 bytes, got {len}")]
    InvalidSecretKey { len: usize },

    #[error("nonce does not match encryption mode {mode}")]
    NonceMismatch { mode: EncryptionMode },

    #[error("failed to seal audio payload")]
    SealFailure,
}

impl Error {
    pub(crate) fn malformed(len: usize, reason: &'static str) -> Self {
        Self::MalformedPacket { len, reason }
    }
}
