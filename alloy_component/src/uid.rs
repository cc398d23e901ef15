// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component unique ids.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Attribute that tags a component's element with its uid.
pub const UID_ATTR: &str = "data-alloy-id";

static NEXT_UID: AtomicU64 = AtomicU64::new(0);

/// A component's unique id.
///
/// Generated ids are unique for the whole process; callers may also supply
/// their own, in which case uniqueness is checked when the component is added
/// to a [`System`](crate::System).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(Rc<str>);

impl Uid {
    /// A fresh id with the given prefix.
    pub fn generate(prefix: &str) -> Self {
        let n = NEXT_UID.fetch_add(1, Ordering::Relaxed);
        Self(Rc::from(format!("{prefix}_{n}")))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uid {
    fn from(s: &str) -> Self {
        Self(Rc::from(s))
    }
}

impl From<String> for Uid {
    fn from(s: String) -> Self {
        Self(Rc::from(s))
    }
}

impl Borrow<str> for Uid {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uid({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        let a = Uid::generate("uid");
        let b = Uid::generate("uid");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("uid_"));
    }
}
