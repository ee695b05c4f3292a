//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Sealing and opening voice payloads with XSalsa20-Poly1305 (NaCl secretbox).
//!
//! A sealed payload is laid out as `tag || ciphertext || suffix` where the suffix
//! is whatever part of the nonce the [`EncryptionMode`] conveys in band.

use std::{borrow::Borrow, fmt};

use crypto_secretbox::{
    aead::{generic_array::GenericArray, AeadInPlace, KeyInit},
    XSalsa20Poly1305,
};
use voice_common::{CheckedSplitAt, Writer};
use zeroize::Zeroizing;

mod mode;

pub use mode::{pad_nonce, EncryptionMode, FreshNonce};

use crate::{
    error::{Error, Result},
    rtp::{Header, Packet, SequenceNumber, Ssrc, Timestamp, RTP_HEADER_LEN},
};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 24;
pub const TAG_LEN: usize = 16;
pub const LITE_NONCE_LEN: usize = 4;

pub type SecretKey = Zeroizing<[u8; KEY_LEN]>;
pub type Nonce = [u8; NONCE_LEN];

pub fn secret_key_from_slice(bytes: &[u8]) -> Result<SecretKey> {
    let key: [u8; KEY_LEN] = bytes
        .try_into()
        .map_err(|_| Error::InvalidSecretKey { len: bytes.len() })?;
    Ok(Zeroizing::new(key))
}

/// A secretbox keyed with the session's secret key.
pub struct Cipher(XSalsa20Poly1305);

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cipher(..)")
    }
}

impl Cipher {
    pub fn new(key: &SecretKey) -> Self {
        Self(XSalsa20Poly1305::new(GenericArray::from_slice(&key[..])))
    }

    pub fn from_slice(key: &[u8]) -> Result<Self> {
        Ok(Self::new(&secret_key_from_slice(key)?))
    }

    /// Appends `tag || ciphertext` for `plaintext` to `out`. On failure `out` is
    /// left as it was.
    pub fn seal_into(&self, nonce: &Nonce, plaintext: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        out.resize(start + TAG_LEN, 0);
        out.extend_from_slice(plaintext);
        match self.0.encrypt_in_place_detached(
            GenericArray::from_slice(&nonce[..]),
            b"",
            &mut out[start + TAG_LEN..],
        ) {
            Ok(tag) => {
                out[start..start + TAG_LEN].copy_from_slice(&tag);
                Ok(())
            }
            Err(_) => {
                out.truncate(start);
                Err(Error::SealFailure)
            }
        }
    }

    /// Verifies `sealed` (`tag || ciphertext`) and appends the plaintext to `out`.
    /// On failure `out` is left as it was.
    pub fn open_into(&self, nonce: &Nonce, sealed: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let (tag, ciphertext) = sealed
            .checked_split_at(TAG_LEN)
            .ok_or(Error::DecryptionAuthFailure)?;
        let start = out.len();
        out.extend_from_slice(ciphertext);
        match self.0.decrypt_in_place_detached(
            GenericArray::from_slice(&nonce[..]),
            b"",
            &mut out[start..],
            GenericArray::from_slice(tag),
        ) {
            Ok(()) => Ok(()),
            Err(_) => {
                out.truncate(start);
                Err(Error::DecryptionAuthFailure)
            }
        }
    }

    pub fn seal(&self, nonce: &Nonce, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut sealed = Vec::with_capacity(TAG_LEN + plaintext.len());
        self.seal_into(nonce, plaintext, &mut sealed)?;
        Ok(sealed)
    }

    pub fn open(&self, nonce: &Nonce, sealed: &[u8]) -> Result<Vec<u8>> {
        let mut plaintext = Vec::with_capacity(sealed.len().saturating_sub(TAG_LEN));
        self.open_into(nonce, sealed, &mut plaintext)?;
        Ok(plaintext)
    }
}

/// Builds the wire form of an outbound voice frame: a fresh fixed header followed
/// by the sealed Opus payload and the mode's nonce suffix.
pub fn seal_packet(
    mode: EncryptionMode,
    cipher: &Cipher,
    sequence: SequenceNumber,
    timestamp: Timestamp,
    ssrc: Ssrc,
    plaintext: &[u8],
    fresh: FreshNonce,
) -> Result<Packet> {
    let header = Header::new(sequence, timestamp, ssrc);
    let nonce = mode.seal_nonce(&header.to_bytes(), fresh)?;

    let mut serialized = Vec::with_capacity(RTP_HEADER_LEN + plaintext.len() + mode.overhead());
    header.write(&mut serialized);
    cipher.seal_into(&nonce, plaintext, &mut serialized)?;
    serialized.extend_from_slice(&nonce[..mode.suffix_len()]);

    Ok(Packet::from_header_and_serialized(header, serialized))
}

/// Verifies and decrypts an inbound voice packet. The result carries the same
/// sequence number, timestamp and SSRC, a canonical fixed header (any header
/// extension is dropped) and the Opus plaintext as its payload.
pub fn open_packet<T: Borrow<[u8]>>(
    mode: EncryptionMode,
    cipher: &Cipher,
    packet: &Packet<T>,
) -> Result<Packet> {
    let payload = packet.payload();
    let (nonce, sealed_len) = mode.open_nonce(packet.header_bytes(), payload)?;

    let header = packet.header();
    let mut serialized =
        Vec::with_capacity((RTP_HEADER_LEN + sealed_len).saturating_sub(TAG_LEN));
    header.write(&mut serialized);
    cipher.open_into(&nonce, &payload[..sealed_len], &mut serialized)?;

    Ok(Packet::from_header_and_serialized(header, serialized))
}
