//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Packet codec for an encrypted voice transport: RTP framing of Opus frames and
//! XSalsa20-Poly1305 sealing under the nonce schemes a voice gateway negotiates.

pub mod config;
pub mod connection;
pub mod crypto;
pub mod error;
pub mod rtp;

pub use error::{Error, Result};
