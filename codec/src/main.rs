//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Seals Opus frames into voice datagrams, or opens voice datagrams, one
//! hex-encoded buffer per line of stdin.

#[macro_use]
extern crate log;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use voice_codec::{
    config::Config,
    connection::{AudioReceiver, AudioSender},
};

#[rustfmt::skip]
fn print_config(config: &Config) {
    info!("config:");
    info!("  {:38}{}", "mode:", config.mode);
    info!("  {:38}{}", "ssrc:", config.ssrc);
    info!("  {:38}{}", "destination:", config.destination);
    info!("  {:38}{}", "frame_samples:", config.frame_samples);
    info!("  {:38}{}", "direction:", if config.open { "open" } else { "seal" });
}

fn seal_lines(config: &Config, input: impl BufRead, mut output: impl Write) -> Result<()> {
    let mut sender = AudioSender::new(config);
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = hex::decode(line.trim())
            .with_context(|| format!("line {} is not a hex encoded frame", index + 1))?;
        let datagram = sender.send_frame(&frame)?;
        writeln!(
            output,
            "{} {}",
            datagram.destination,
            hex::encode(&datagram.bytes)
        )?;
    }
    Ok(())
}

fn open_lines(config: &Config, input: impl BufRead, mut output: impl Write) -> Result<()> {
    let receiver = AudioReceiver::from_config(config);
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let datagram = hex::decode(line.trim())
            .with_context(|| format!("line {} is not a hex encoded datagram", index + 1))?;
        match receiver.receive(&datagram) {
            Some(packet) => writeln!(
                output,
                "ssrc={} seq={} ts={} {}",
                packet.ssrc(),
                packet.sequence(),
                packet.timestamp(),
                hex::encode(packet.payload())
            )?,
            None => writeln!(output, "dropped")?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging.
    env_logger::Builder::from_env(
        Env::default()
            .default_filter_or("voice_codec=info")
            .default_write_style_or("never"),
    )
    .format(voice_common::format_log_line)
    .init();

    info!(
        "voice_codec: v{}",
        option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")
    );

    let config = Config::parse();
    print_config(&config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    if config.open {
        open_lines(&config, stdin.lock(), stdout.lock())?;
    } else {
        seal_lines(&config, stdin.lock(), stdout.lock())?;
    }

    let report = metrics::metrics!().report();
    for event in report.nonzero() {
        match event.tags() {
            Some(tags) => info!("{} {:?}: {}", event.name(), tags, event.event_count()),
            None => info!("{}: {}", event.name(), event.event_count()),
        }
    }
    Ok(())
}
