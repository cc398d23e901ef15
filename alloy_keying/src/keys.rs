// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key codes and key matchers.

use alloy_component::KeyEvent;
use smallvec::SmallVec;

/// Backspace.
pub const BACKSPACE: u32 = 8;
/// Tab.
pub const TAB: u32 = 9;
/// Enter / Return.
pub const ENTER: u32 = 13;
/// Shift.
pub const SHIFT: u32 = 16;
/// Control.
pub const CTRL: u32 = 17;
/// Escape.
pub const ESCAPE: u32 = 27;
/// Space bar.
pub const SPACE: u32 = 32;
/// Left arrow.
pub const LEFT: u32 = 37;
/// Up arrow.
pub const UP: u32 = 38;
/// Right arrow.
pub const RIGHT: u32 = 39;
/// Down arrow.
pub const DOWN: u32 = 40;

/// Matches a key event by key code and, optionally, by modifier state.
///
/// `None` for a modifier means "don't care".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyMatcher {
    keys: SmallVec<[u32; 2]>,
    shift: Option<bool>,
    ctrl: Option<bool>,
}

impl KeyMatcher {
    /// Any of `keys`, whatever the modifiers.
    pub fn in_set(keys: &[u32]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            shift: None,
            ctrl: None,
        }
    }

    /// Require shift to be held.
    pub fn shifted(mut self) -> Self {
        self.shift = Some(true);
        self
    }

    /// Require shift to be released.
    pub fn unshifted(mut self) -> Self {
        self.shift = Some(false);
        self
    }

    /// Require control to be held.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = Some(true);
        self
    }

    /// Returns true if `key` satisfies every condition.
    pub fn matches(&self, key: KeyEvent) -> bool {
        self.keys.contains(&key.key_code)
            && self.shift.is_none_or(|s| s == key.shift())
            && self.ctrl.is_none_or(|c| c == key.ctrl())
    }

    /// Returns true if no key code can match.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
