// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Supporting behaviours. Each module exports its behaviour singleton and the
//! free functions that make up its API.

pub mod focusing;
pub mod highlighting;
pub mod receiving;
pub mod replacing;
pub mod representing;
pub mod tabstopping;
pub mod toggling;
pub mod transitioning;

use alloy_component::BehaviourRegistry;

/// A registry holding every behaviour of this crate and `keying`, for specs
/// read from JSON.
pub fn registry() -> BehaviourRegistry {
    BehaviourRegistry::new()
        .with(focusing::focusing())
        .with(highlighting::highlighting())
        .with(receiving::receiving())
        .with(replacing::replacing())
        .with(representing::representing())
        .with(tabstopping::tabstopping())
        .with(toggling::toggling())
        .with(transitioning::transitioning())
        .with(alloy_keying::keying())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_component::{ComponentSpec, System};

    #[test]
    fn json_specs_resolve_through_the_registry() {
        let json = r#"{
            "dom": { "tag": "button", "classes": ["toggle"] },
            "uid": "bold",
            "behaviours": {
                "focusing": {},
                "tabstopping": {},
                "toggling": { "toggle_class": "on", "aria": "pressed" },
                "keying": { "mode": "execution" }
            }
        }"#;
        let spec = ComponentSpec::from_json(json, &registry()).unwrap();
        let mut system = System::default();
        let c = system.build(spec).unwrap();
        system.attach_to_body(c).unwrap();

        assert!(!system.emit_execute(c), "toggling lets execute through");
        assert!(toggling::is_on(&system, c));
        assert_eq!(system.doc().attr(c.element(), "aria-pressed"), Some("true"));
        assert_eq!(system.doc().attr(c.element(), "tabindex"), Some("-1"));
    }
}
