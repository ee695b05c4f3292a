//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use std::io::Write;

use env_logger::fmt::Formatter;
use log::Record;

/// One line per record: timestamp, level, source location and message.
pub fn format_log_line(buf: &mut Formatter, record: &Record) -> std::io::Result<()> {
    let timestamp = buf.timestamp_millis();
    writeln!(
        buf,
        "{} {:<5} {}:{} {}",
        timestamp,
        record.level(),
        record.file().unwrap_or("?"),
        record.line().unwrap_or(0),
        record.args()
    )
}
