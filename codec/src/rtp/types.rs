//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

pub type PayloadType = u8;
pub type SequenceNumber = u16; // Wraps every 65536 frames
pub type Timestamp = u32; // In samples of the 48kHz Opus clock
pub type Ssrc = u32;
