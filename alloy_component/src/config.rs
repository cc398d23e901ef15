// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! System-wide settings.

/// Settings fixed when a [`System`](crate::System) is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemConfig {
    /// Touch device: [`EventKind::Tap`](crate::EventKind::Tap) stays `alloy.tap`.
    /// Otherwise it is an alias of native `click`.
    pub touch: bool,
    /// Record dispatch traces from the start.
    pub monitor_events: bool,
    /// Maximum number of traces kept by the monitor.
    pub monitor_capacity: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            touch: false,
            monitor_events: false,
            monitor_capacity: 64,
        }
    }
}
