//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use log::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use voice_common::CheckedSplitAt;

use super::{Nonce, LITE_NONCE_LEN, NONCE_LEN, TAG_LEN};
use crate::{
    error::{Error, Result},
    rtp::RTP_HEADER_LEN,
};

/// How the 24-byte nonce for a voice payload is chosen and conveyed.
///
/// The names are the ones the voice gateway negotiates.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    IntoStaticStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum EncryptionMode {
    /// The nonce is the packet's fixed header, zero padded. Nothing is appended.
    #[strum(serialize = "xsalsa20_poly1305")]
    #[serde(rename = "xsalsa20_poly1305")]
    Normal,
    /// A random nonce is appended in full.
    #[strum(serialize = "xsalsa20_poly1305_suffix")]
    #[serde(rename = "xsalsa20_poly1305_suffix")]
    Suffix,
    /// A big-endian counter, zero padded. Its four bytes are appended.
    #[strum(serialize = "xsalsa20_poly1305_lite")]
    #[serde(rename = "xsalsa20_poly1305_lite")]
    Lite,
}

/// The per-packet nonce material a sender supplies when sealing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FreshNonce {
    /// Normal mode derives its nonce from the header.
    None,
    Random([u8; NONCE_LEN]),
    Counter(u32),
}

impl EncryptionMode {
    pub fn from_negotiated(name: &str) -> Result<Self> {
        name.parse().map_err(|_| {
            debug!("unsupported encryption mode offered: {:?}", name);
            Error::UnsupportedEncryptionMode(name.to_string())
        })
    }

    pub fn as_negotiated(self) -> &'static str {
        self.into()
    }

    /// Number of nonce bytes appended after the sealed payload.
    pub const fn suffix_len(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Suffix => NONCE_LEN,
            Self::Lite => LITE_NONCE_LEN,
        }
    }

    /// Bytes a sealed payload adds over the plaintext.
    pub const fn overhead(self) -> usize {
        TAG_LEN + self.suffix_len()
    }

    /// The nonce to seal with. `header` is the fixed header of the packet being
    /// built. The first [`Self::suffix_len`] bytes of the result are what gets
    /// appended to the payload.
    pub fn seal_nonce(self, header: &[u8; RTP_HEADER_LEN], fresh: FreshNonce) -> Result<Nonce> {
        match (self, fresh) {
            (Self::Normal, FreshNonce::None) => Ok(pad_nonce(header)),
            (Self::Suffix, FreshNonce::Random(nonce)) => Ok(nonce),
            (Self::Lite, FreshNonce::Counter(counter)) => Ok(pad_nonce(&counter.to_be_bytes())),
            (mode, _) => Err(Error::NonceMismatch { mode }),
        }
    }

    /// The nonce to open with, and the length of the sealed part of `payload`
    /// (tag and ciphertext, without the appended nonce).
    pub fn open_nonce(self, header: &[u8], payload: &[u8]) -> Result<(Nonce, usize)> {
        match self {
            Self::Normal => Ok((pad_nonce(header), payload.len())),
            Self::Suffix | Self::Lite => {
                let (sealed, suffix) = payload
                    .checked_split_from_end(self.suffix_len())
                    .ok_or_else(|| {
                        Error::malformed(payload.len(), "payload shorter than its nonce")
                    })?;
                Ok((pad_nonce(suffix), sealed.len()))
            }
        }
    }
}

/// Copies up to 24 bytes into an otherwise zeroed nonce.
pub fn pad_nonce(bytes: &[u8]) -> Nonce {
    let mut nonce = [0u8; NONCE_LEN];
    let len = bytes.len().min(NONCE_LEN);
    nonce[..len].copy_from_slice(&bytes[..len]);
    nonce
}

#[cfg(test)]
mod test {
    use hex_literal::hex;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_negotiated_names() {
        for (mode, name) in [
            (EncryptionMode::Normal, "xsalsa20_poly1305"),
            (EncryptionMode::Suffix, "xsalsa20_poly1305_suffix"),
            (EncryptionMode::Lite, "xsalsa20_poly1305_lite"),
        ] {
            assert_eq!(name, mode.as_negotiated());
            assert_eq!(name, mode.to_string());
            assert_eq!(Ok(mode), EncryptionMode::from_negotiated(name));
        }

        assert_eq!(
            Err(Error::UnsupportedEncryptionMode("aead_aes256_gcm".to_string())),
            EncryptionMode::from_negotiated("aead_aes256_gcm")
        );
        assert!(EncryptionMode::from_negotiated("XSALSA20_POLY1305").is_err());
        assert!(EncryptionMode::from_negotiated("").is_err());
    }

    #[test]
    fn test_serde_uses_negotiated_names() {
        for mode in EncryptionMode::iter() {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(format!("\"{}\"", mode.as_negotiated()), json);
            assert_eq!(mode, serde_json::from_str::<EncryptionMode>(&json).unwrap());
        }
        assert!(serde_json::from_str::<EncryptionMode>("\"Lite\"").is_err());
    }

    #[test]
    fn test_overhead() {
        assert_eq!(16, EncryptionMode::Normal.overhead());
        assert_eq!(40, EncryptionMode::Suffix.overhead());
        assert_eq!(20, EncryptionMode::Lite.overhead());
    }

    #[test]
    fn test_pad_nonce() {
        assert_eq!([0u8; NONCE_LEN], pad_nonce(&[]));

        let nonce = pad_nonce(&hex!("00000001"));
        assert_eq!(hex!("00000001"), nonce[..4]);
        assert_eq!([0u8; 20], nonce[4..]);

        assert_eq!([7u8; NONCE_LEN], pad_nonce(&[7u8; 30]));
    }

    #[test]
    fn test_seal_nonce() {
        let header = hex!("8078 0001 000003c0 deadbeef");

        let nonce = EncryptionMode::Normal
            .seal_nonce(&header, FreshNonce::None)
            .unwrap();
        assert_eq!(header, nonce[..RTP_HEADER_LEN]);
        assert_eq!([0u8; 12], nonce[RTP_HEADER_LEN..]);

        let random = [0x42u8; NONCE_LEN];
        assert_eq!(
            Ok(random),
            EncryptionMode::Suffix.seal_nonce(&header, FreshNonce::Random(random))
        );

        let nonce = EncryptionMode::Lite
            .seal_nonce(&header, FreshNonce::Counter(0x01020304))
            .unwrap();
        assert_eq!(hex!("01020304"), nonce[..EncryptionMode::Lite.suffix_len()]);
        assert_eq!([0u8; 20], nonce[4..]);
    }

    #[test]
    fn test_seal_nonce_mismatch() {
        let header = [0u8; RTP_HEADER_LEN];
        for (mode, fresh) in [
            (EncryptionMode::Normal, FreshNonce::Counter(1)),
            (EncryptionMode::Suffix, FreshNonce::None),
            (EncryptionMode::Suffix, FreshNonce::Counter(1)),
            (EncryptionMode::Lite, FreshNonce::Random([1; NONCE_LEN])),
        ] {
            assert_eq!(
                Err(Error::NonceMismatch { mode }),
                mode.seal_nonce(&header, fresh)
            );
        }
    }

    #[test]
    fn test_open_nonce() {
        let header = hex!("8078 0001 000003c0 deadbeef");
        let payload = hex!("aaaaaaaa bbbbbbbb 00000007");

        let (nonce, sealed_len) = EncryptionMode::Normal.open_nonce(&header, &payload).unwrap();
        assert_eq!(pad_nonce(&header), nonce);
        assert_eq!(payload.len(), sealed_len);

        let (nonce, sealed_len) = EncryptionMode::Lite.open_nonce(&header, &payload).unwrap();
        assert_eq!(pad_nonce(&hex!("00000007")), nonce);
        assert_eq!(8, sealed_len);

        assert!(matches!(
            EncryptionMode::Suffix.open_nonce(&header, &payload),
            Err(Error::MalformedPacket { len: 12, .. })
        ));
        // Exactly a nonce and nothing else is fine here; opening rejects it later.
        let (_, sealed_len) = EncryptionMode::Lite
            .open_nonce(&header, &payload[8..])
            .unwrap();
        assert_eq!(0, sealed_len);
    }
}
