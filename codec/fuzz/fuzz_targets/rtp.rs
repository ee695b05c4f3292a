//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

#![no_main]

use libfuzzer_sys::fuzz_target;
use voice_codec::rtp::{looks_like_rtp, payload_start, Packet, RTP_HEADER_LEN};

fuzz_target!(|data: &[u8]| {
    let _ = looks_like_rtp(data);
    match Packet::parse(data) {
        Ok(packet) => {
            let start = packet.payload_range().start;
            assert!(start >= RTP_HEADER_LEN && start <= data.len());
            assert_eq!(Ok(start), payload_start(data));
            assert_eq!(packet.sequence(), u16::from_be_bytes([data[2], data[3]]));
        }
        Err(_) => assert!(payload_start(data).is_err()),
    }
});
