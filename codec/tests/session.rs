//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use clap::Parser;
use voice_codec::{
    config::Config,
    connection::{AudioReceiver, AudioSender},
    crypto::EncryptionMode,
};

fn config(mode: &str) -> Config {
    Config::try_parse_from([
        "voice_codec",
        "--secret-key",
        "c0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ff",
        "--mode",
        mode,
        "--ssrc",
        "1234",
        "--destination",
        "198.51.100.10:50004",
    ])
    .unwrap()
}

#[test]
fn stream_of_frames_round_trips_in_every_mode() {
    let _ = env_logger::builder().is_test(true).try_init();

    for mode in [
        "xsalsa20_poly1305",
        "xsalsa20_poly1305_suffix",
        "xsalsa20_poly1305_lite",
    ] {
        let config = config(mode);
        assert_eq!(mode, config.mode.as_negotiated());

        let mut sender = AudioSender::new(&config).with_initial_state(u16::MAX - 2, 0, u32::MAX);
        let receiver = AudioReceiver::from_config(&config);

        let mut sequences = Vec::new();
        for frame_index in 0..6u8 {
            let frame = vec![frame_index; 40 + usize::from(frame_index)];
            let datagram = sender.send_frame(&frame).unwrap();
            assert_eq!(config.destination, datagram.destination);

            let packet = receiver.receive(&datagram.bytes).unwrap();
            assert_eq!(1234, packet.ssrc());
            assert_eq!(u32::from(frame_index) * 960, packet.timestamp());
            assert_eq!(&frame[..], packet.payload());
            sequences.push(packet.sequence());
        }
        assert_eq!(vec![65533, 65534, 65535, 0, 1, 2], sequences);
    }
}

#[test]
fn mismatched_modes_drop_everything() {
    let mut sender = AudioSender::new(&config("xsalsa20_poly1305_lite"));
    let receiver = AudioReceiver::from_config(&config("xsalsa20_poly1305_suffix"));
    assert_eq!(EncryptionMode::Suffix, receiver.mode());

    for _ in 0..10 {
        let datagram = sender.send_frame(b"opus frame").unwrap();
        assert!(receiver.receive(&datagram.bytes).is_none());
    }
}
