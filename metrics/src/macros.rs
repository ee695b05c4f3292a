//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Mutex;

use crate::reporter::{EventCountReporter, EventReport};

/// Every event reporter in the process.
///
/// The lock is taken when a call site registers its reporter and when a report
/// is generated, never while counting.
pub struct Metrics {
    enabled: AtomicBool,
    reporters: Mutex<Vec<Arc<EventCountReporter>>>,
}

#[derive(Debug)]
pub struct Report {
    pub events: Vec<EventReport>,
}

impl Report {
    /// Total for `name` across all of its tag sets.
    pub fn event_count(&self, name: &str) -> usize {
        self.events
            .iter()
            .filter(|event| event.name() == name)
            .map(EventReport::event_count)
            .sum()
    }

    /// The events that were counted at least once since the last report.
    pub fn nonzero(&self) -> impl Iterator<Item = &EventReport> {
        self.events.iter().filter(|event| event.event_count() > 0)
    }
}

impl Metrics {
    pub(crate) fn new_enabled() -> Metrics {
        Metrics {
            enabled: AtomicBool::new(true),
            reporters: Mutex::new(Vec::new()),
        }
    }

    /// Registers the reporter behind one `event!` call site.
    ///
    /// Panics if `name` is already registered: two call sites sharing a name
    /// would silently split its count.
    pub fn create_and_register_event(&self, name: &'static str) -> Arc<EventCountReporter> {
        let mut reporters = self.reporters.lock();
        if reporters.iter().any(|reporter| reporter.name() == name) {
            panic!("The metric name \"{}\" has been used elsewhere.", name);
        }

        let reporter = Arc::new(EventCountReporter::new(name));
        if !self.enabled() {
            reporter.disable();
        }
        reporters.push(Arc::clone(&reporter));
        reporter
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Drains every counter into a report sorted by event name.
    pub fn report(&self) -> Report {
        let mut events = self
            .reporters
            .lock()
            .iter()
            .flat_map(|reporter| reporter.report())
            .collect::<Vec<_>>();
        events.sort_by_key(|event| event.name());
        Report { events }
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
        for reporter in self.reporters.lock().iter() {
            reporter.disable();
        }
    }
}

#[macro_export]
macro_rules! event_reporter {
    ($name:expr) => {{
        static __REPORTER: once_cell::sync::Lazy<
            std::sync::Arc<$crate::metric_config::EventCountReporter>,
        > = once_cell::sync::Lazy::new(|| $crate::__METRICS.create_and_register_event($name));

        &__REPORTER
    }};
}

/// Counts an event: `event!(name)`, `event!(name, n)` or `event!(name, n, tags)`.
/// Each name may appear at one call site only.
#[macro_export]
macro_rules! event {
    ($name:expr) => {
        $crate::event_reporter!($name).count()
    };
    ($name:expr, $count:expr) => {
        $crate::event_reporter!($name).count_n($count)
    };
    ($name:expr, $count:expr, $tags:expr) => {
        $crate::event_reporter!($name).count_n_tagged($count, $tags)
    };
}

#[macro_export]
macro_rules! metrics {
    () => {{
        &$crate::__METRICS
    }};
}
