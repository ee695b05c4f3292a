//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! The two directions of a voice session: sealing outbound Opus frames into
//! datagrams and opening inbound datagrams back into Opus frames.

use std::{net::SocketAddr, num::Wrapping};

use log::*;
use metrics::{event, metric_config::StaticStrTagsRef};
use once_cell::sync::Lazy;
use rand::Rng;
use strum::IntoEnumIterator;

use crate::{
    config::Config,
    crypto::{open_packet, seal_packet, Cipher, EncryptionMode, FreshNonce, SecretKey, NONCE_LEN},
    error::{Error, Result},
    rtp::{looks_like_rtp, Datagram, Packet, SequenceNumber, Ssrc, Timestamp},
};

/// One `mode:<negotiated name>` tag set per mode, indexed by discriminant.
static MODE_TAGS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    EncryptionMode::iter()
        .map(|mode| {
            let tag: &'static str =
                Box::leak(format!("mode:{}", mode.as_negotiated()).into_boxed_str());
            vec![tag]
        })
        .collect()
});

fn mode_tags(mode: EncryptionMode) -> StaticStrTagsRef {
    MODE_TAGS.get(mode as usize)
}

/// Outbound half of a voice session.
///
/// Sequence number, timestamp and the Lite nonce counter start at random values
/// (RFC 3550 section 5.1) and wrap.
#[derive(Debug)]
pub struct AudioSender {
    ssrc: Ssrc,
    mode: EncryptionMode,
    cipher: Cipher,
    destination: SocketAddr,
    frame_samples: u32,
    sequence: Wrapping<SequenceNumber>,
    timestamp: Wrapping<Timestamp>,
    lite_counter: Wrapping<u32>,
}

impl AudioSender {
    pub fn new(config: &Config) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            ssrc: config.ssrc,
            mode: config.mode,
            cipher: Cipher::new(&config.secret_key),
            destination: config.destination,
            frame_samples: config.frame_samples,
            sequence: Wrapping(rng.gen()),
            timestamp: Wrapping(rng.gen()),
            lite_counter: Wrapping(rng.gen()),
        }
    }

    /// Replaces the random starting point, for replaying a known stream.
    pub fn with_initial_state(
        mut self,
        sequence: SequenceNumber,
        timestamp: Timestamp,
        lite_counter: u32,
    ) -> Self {
        self.sequence = Wrapping(sequence);
        self.timestamp = Wrapping(timestamp);
        self.lite_counter = Wrapping(lite_counter);
        self
    }

    pub fn mode(&self) -> EncryptionMode {
        self.mode
    }

    pub fn next_sequence(&self) -> SequenceNumber {
        self.sequence.0
    }

    pub fn next_timestamp(&self) -> Timestamp {
        self.timestamp.0
    }

    fn fresh_nonce(&mut self) -> FreshNonce {
        match self.mode {
            EncryptionMode::Normal => FreshNonce::None,
            EncryptionMode::Suffix => {
                let mut nonce = [0u8; NONCE_LEN];
                rand::thread_rng().fill(&mut nonce);
                FreshNonce::Random(nonce)
            }
            EncryptionMode::Lite => {
                let counter = self.lite_counter.0;
                self.lite_counter += Wrapping(1);
                FreshNonce::Counter(counter)
            }
        }
    }

    /// Seals one Opus frame into the next datagram of the stream.
    pub fn send_frame(&mut self, opus_frame: &[u8]) -> Result<Datagram> {
        let fresh = self.fresh_nonce();
        let packet = seal_packet(
            self.mode,
            &self.cipher,
            self.sequence.0,
            self.timestamp.0,
            self.ssrc,
            opus_frame,
            fresh,
        )
        .map_err(|err| {
            event!("voice.crypto.seal.failure", 1, mode_tags(self.mode));
            warn!("failed to seal frame {}: {}", self.sequence, err);
            err
        })?;

        self.sequence += Wrapping(1);
        self.timestamp += Wrapping(self.frame_samples);
        trace!(
            "sealed frame ssrc={} seq={} ts={} len={}",
            packet.ssrc(),
            packet.sequence(),
            packet.timestamp(),
            packet.serialized().len()
        );
        Ok(packet.into_datagram(self.destination))
    }

    /// Advances the timestamp over samples that were not sent, such as silence.
    pub fn skip_samples(&mut self, samples: u32) {
        self.timestamp += Wrapping(samples);
    }
}

/// Inbound half of a voice session.
#[derive(Debug)]
pub struct AudioReceiver {
    mode: EncryptionMode,
    cipher: Cipher,
}

impl AudioReceiver {
    pub fn new(mode: EncryptionMode, secret_key: &SecretKey) -> Self {
        Self {
            mode,
            cipher: Cipher::new(secret_key),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mode, &config.secret_key)
    }

    pub fn mode(&self) -> EncryptionMode {
        self.mode
    }

    /// Parses and opens a datagram, saying why if it can't.
    pub fn try_receive(&self, datagram: &[u8]) -> Result<Packet> {
        let packet = Packet::parse(datagram)?;
        open_packet(self.mode, &self.cipher, &packet)
    }

    /// Parses and opens a datagram. Anything that isn't an authentic voice packet
    /// is counted, logged and dropped.
    pub fn receive(&self, datagram: &[u8]) -> Option<Packet> {
        if !looks_like_rtp(datagram) {
            event!("voice.rtp.invalid.not_rtp");
            trace!("ignoring non-RTP datagram of {} bytes", datagram.len());
            return None;
        }

        match self.try_receive(datagram) {
            Ok(packet) => Some(packet),
            Err(err) => {
                self.record_drop(&err);
                debug!("dropping voice datagram: {}", err);
                debug!("{}", hex::encode(&datagram[..datagram.len().min(100)]));
                None
            }
        }
    }

    fn record_drop(&self, err: &Error) {
        match err {
            Error::MalformedPacket { .. } => {
                event!("voice.rtp.invalid.malformed");
            }
            Error::DecryptionAuthFailure => {
                event!("voice.crypto.open.auth_failure", 1, mode_tags(self.mode));
            }
            other => {
                warn!("unexpected error opening voice datagram: {}", other);
            }
        }
    }
}
