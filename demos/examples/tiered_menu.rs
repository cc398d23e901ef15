// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Walk a sliding tiered menu with the keyboard.
//!
//! This demo shows how to combine:
//! - `alloy_widgets::tiered_menu` for the menus and their paths,
//! - `alloy_keying` for the key handling,
//! - the event monitor of `alloy_component` for tracing dispatches.
//!
//! Run:
//! - `cargo run -p alloy_demos --example tiered_menu`
//! - `RUST_LOG=alloy=debug cargo run -p alloy_demos --example tiered_menu` for the engine's own logs

use alloy_component::{ComponentId, EventKind, KeyEvent, RawEvent, System};
use alloy_keying::{DOWN, ENTER, LEFT, RIGHT, focus_in};
use alloy_widgets::hooks::ItemAction;
use alloy_widgets::tiered_menu::{self, get_active_item, get_active_menu};
use alloy_widgets::{MenuItem, TieredData, TieredHooks, TieredMenuSpec, item_value, menu_value};
use tracing::info;

/// Matched by the default `alloy=info` filter.
const TARGET: &str = "alloy_demos::tiered_menu";

fn items(values: &[(&str, &str)]) -> Vec<MenuItem> {
    values.iter().map(|(v, t)| MenuItem::new(v, t)).collect()
}

fn data() -> TieredData {
    TieredData {
        primary: "main".to_owned(),
        menus: vec![
            (
                "main".to_owned(),
                items(&[("file", "File"), ("edit", "Edit"), ("quit", "Quit")]),
            ),
            (
                "file".to_owned(),
                items(&[("new", "New"), ("open", "Open"), ("recent", "Open Recent")]),
            ),
            ("recent".to_owned(), items(&[("notes", "notes.txt")])),
            ("edit".to_owned(), items(&[("undo", "Undo"), ("redo", "Redo")])),
        ],
        expansions: vec![
            ("file".to_owned(), "file".to_owned()),
            ("recent".to_owned(), "recent".to_owned()),
            ("edit".to_owned(), "edit".to_owned()),
        ],
    }
}

fn press(system: &mut System, code: u32) {
    let Some(focused) = system.doc().focused() else {
        return;
    };
    let handled = system.trigger(EventKind::KeyDown, RawEvent::Key(KeyEvent::new(code)), focused);
    let steps = system
        .monitor()
        .and_then(|m| m.last())
        .map(|t| t.outcomes())
        .unwrap_or_default();
    info!(target: TARGET, code, handled, ?steps, "key pressed");
}

/// Land every slide in flight.
fn settle(system: &mut System, container: ComponentId) {
    for menu in system.children(container).to_vec() {
        system.trigger(EventKind::TransitionEnd, RawEvent::None, menu.element());
    }
}

fn report(system: &System, container: ComponentId) {
    let doc = system.doc();
    let menu = get_active_menu(system, container).and_then(|m| menu_value(doc, m.element()));
    let item = get_active_item(system, container).and_then(|i| item_value(doc, i.element()));
    info!(target: TARGET, ?menu, ?item, "active");
}

fn main() {
    alloy_demos::init_logging();

    let hooks = TieredHooks {
        on_execute: Some(ItemAction::new(|system, _, item| {
            let value = item_value(system.doc(), item.element()).unwrap_or_default();
            info!(target: TARGET, value, "executed");
            true
        })),
        ..tiered_menu::sliding_hooks()
    };
    let spec = TieredMenuSpec {
        data: data(),
        hooks,
        sliding: true,
        ..TieredMenuSpec::default()
    };

    let mut system = System::default();
    system.enable_monitor(16);
    let container = system
        .build(alloy_widgets::tiered_menu(spec))
        .expect("the tiered menu builds");
    system
        .attach_to_body(container)
        .expect("the tiered menu attaches");
    focus_in(&mut system, container);
    report(&system, container);

    for code in [RIGHT, DOWN, DOWN, RIGHT, ENTER, LEFT, LEFT] {
        press(&mut system, code);
        settle(&mut system, container);
        report(&system, container);
    }
}
