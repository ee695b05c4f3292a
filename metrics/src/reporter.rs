//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

use std::{
    ptr,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use parking_lot::RwLock;

/// A tag set that lives for the whole process. Tag sets are compared by
/// address, so each distinct set should come from its own static.
pub type StaticStrTagsRef = Option<&'static Vec<&'static str>>;

/// Counts occurrences of one named event.
///
/// Untagged counts go to a single atomic. Tagged counts get one atomic per tag
/// set; there are only ever a handful of sets per event, so they are kept in a
/// list and found by address.
pub struct EventCountReporter {
    name: &'static str,
    enabled: AtomicBool,
    untagged: AtomicUsize,
    tagged: RwLock<Vec<(&'static Vec<&'static str>, AtomicUsize)>>,
}

impl EventCountReporter {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            enabled: AtomicBool::new(true),
            untagged: AtomicUsize::new(0),
            tagged: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn count(&self) {
        self.count_n_tagged(1, None);
    }

    pub fn count_n(&self, n: usize) {
        self.count_n_tagged(n, None);
    }

    pub fn count_n_tagged(&self, n: usize, tags: StaticStrTagsRef) {
        if !self.enabled.load(Ordering::Relaxed) {
            return;
        }
        let Some(tags) = tags else {
            self.untagged.fetch_add(n, Ordering::Relaxed);
            return;
        };

        if let Some((_, counter)) = self.tagged.read().iter().find(|(t, _)| ptr::eq(*t, tags)) {
            counter.fetch_add(n, Ordering::Relaxed);
            return;
        }

        let mut tagged = self.tagged.write();
        // Another thread may have added the set while we waited.
        match tagged.iter().find(|(t, _)| ptr::eq(*t, tags)) {
            Some((_, counter)) => {
                counter.fetch_add(n, Ordering::Relaxed);
            }
            None => tagged.push((tags, AtomicUsize::new(n))),
        }
    }

    /// Takes the current counts, leaving zero behind. The untagged count is
    /// always reported; tag sets only once they have been seen.
    pub fn report(&self) -> Vec<EventReport> {
        let untagged = EventReport {
            name: self.name,
            event_count: self.untagged.swap(0, Ordering::Relaxed),
            tags: None,
        };
        std::iter::once(untagged)
            .chain(self.tagged.read().iter().map(|(tags, counter)| EventReport {
                name: self.name,
                event_count: counter.swap(0, Ordering::Relaxed),
                tags: Some(*tags),
            }))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventReport {
    name: &'static str,
    event_count: usize,
    tags: StaticStrTagsRef,
}

impl EventReport {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }

    pub fn tags(&self) -> StaticStrTagsRef {
        self.tags
    }
}
