//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Process-wide event counters. Count with `event!`, drain with
//! `metrics!().report()`.

use once_cell::sync::Lazy;

use crate::macros::Metrics;

#[doc(hidden)]
pub static __METRICS: Lazy<Metrics> = Lazy::new(Metrics::new_enabled);

pub mod metric_config {
    pub use crate::{
        macros::{Metrics, Report},
        reporter::{EventCountReporter, EventReport, StaticStrTagsRef},
    };
}

#[macro_use]
mod macros;
mod reporter;
