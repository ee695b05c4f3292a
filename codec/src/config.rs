//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Configuration options for a voice session, set by command line arguments.

use std::{fmt, net::SocketAddr};

use zeroize::Zeroizing;

use crate::{
    crypto::{secret_key_from_slice, EncryptionMode, SecretKey},
    rtp::Ssrc,
};

/// The Opus frame size the voice gateway expects: 20ms at 48kHz.
pub const DEFAULT_FRAME_SAMPLES: u32 = 960;

#[derive(clap::Parser, Clone)]
#[clap(name = "voice_codec")]
pub struct Config {
    /// The 32-byte secret key from the gateway's session description, hex encoded.
    #[clap(long, value_parser = parse_secret_key)]
    pub secret_key: SecretKey,

    /// The encryption mode negotiated with the gateway.
    #[clap(long, value_parser = EncryptionMode::from_negotiated, default_value = "xsalsa20_poly1305_lite")]
    pub mode: EncryptionMode,

    /// The SSRC assigned to this session by the gateway.
    #[clap(long)]
    pub ssrc: Ssrc,

    /// Where outbound voice datagrams are sent.
    #[clap(long, default_value = "127.0.0.1:50000")]
    pub destination: SocketAddr,

    /// Timestamp increment per Opus frame, in samples.
    #[clap(long, default_value = "960")]
    pub frame_samples: u32,

    /// Open inbound datagrams instead of sealing outbound frames.
    #[clap(long)]
    pub open: bool,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"<redacted>")
            .field("mode", &self.mode)
            .field("ssrc", &self.ssrc)
            .field("destination", &self.destination)
            .field("frame_samples", &self.frame_samples)
            .field("open", &self.open)
            .finish()
    }
}

fn parse_secret_key(value: &str) -> anyhow::Result<SecretKey> {
    let bytes = Zeroizing::new(hex::decode(value.trim())?);
    Ok(secret_key_from_slice(&bytes)?)
}

#[cfg(test)]
pub(crate) fn default_test_config() -> Config {
    Config {
        secret_key: Zeroizing::new([0x11; 32]),
        mode: EncryptionMode::Lite,
        ssrc: 0xDEADBEEF,
        destination: "127.0.0.1:50000".parse().unwrap(),
        frame_samples: DEFAULT_FRAME_SAMPLES,
        open: false,
    }
}
