//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use voice_codec::{
    connection::AudioReceiver,
    crypto::{EncryptionMode, SecretKey},
};

fuzz_target!(|data: &[u8]| {
    let mut gen = Unstructured::new(data);
    let Ok(mode) = gen.choose(&[
        EncryptionMode::Normal,
        EncryptionMode::Suffix,
        EncryptionMode::Lite,
    ]) else {
        return;
    };
    let Ok(key) = gen.arbitrary::<[u8; 32]>() else {
        return;
    };

    let receiver = AudioReceiver::new(*mode, &SecretKey::new(key));
    if let Some(packet) = receiver.receive(gen.take_rest()) {
        assert_eq!(packet.header_bytes(), &packet.header().to_bytes()[..]);
    }
});
