// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `tabstopping`: mark the component as a tab-stop for `acyclic` and
//! `cyclic` keying.

use std::rc::Rc;

use alloy_component::Behaviour;
use alloy_dom::DomModification;
use alloy_schema::field::defaulted_of;
use alloy_schema::{Value, string};

/// Behaviour name.
pub const TABSTOPPING: &str = "tabstopping";

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = Behaviour::define(TABSTOPPING)
        .fields(vec![defaulted_of(
            "tab_attr",
            Value::from("data-alloy-tabstop"),
            string(),
        )])
        .exhibit(|config| {
            let attr = config.str("tab_attr").unwrap_or("data-alloy-tabstop");
            DomModification::default().with_attr(attr, "true")
        })
        .build();
}

/// The tabstopping behaviour.
///
/// Config: `tab_attr` (default `data-alloy-tabstop`), set to `"true"` on the
/// element. The default matches [`DEFAULT_TABSTOP_SELECTOR`].
///
/// [`DEFAULT_TABSTOP_SELECTOR`]: alloy_keying::DEFAULT_TABSTOP_SELECTOR
pub fn tabstopping() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_component::{ComponentSpec, System};
    use alloy_keying::DEFAULT_TABSTOP_SELECTOR;

    #[test]
    fn marks_a_default_tabstop() {
        let mut system = System::default();
        let c = system
            .build(ComponentSpec::new("div").with(&tabstopping(), Value::empty_object()))
            .unwrap();
        assert!(system.doc().matches(c.element(), DEFAULT_TABSTOP_SELECTOR));

        let custom = system
            .build(ComponentSpec::new("div").with(
                &tabstopping(),
                Value::object([("tab_attr", Value::from("data-stop"))]),
            ))
            .unwrap();
        assert_eq!(system.doc().attr(custom.element(), "data-stop"), Some("true"));
    }
}
