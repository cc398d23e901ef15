// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiered menu: a primary menu whose items can open submenus.
//!
//! The container keeps a path of open menus, deepest first. The deepest one
//! is the active menu: it carries the container's highlight and, while the
//! container holds focus, the document focus. The others are marked as
//! background menus. Submenus are built the first time they open.
//!
//! Right (or executing an item with a submenu) goes one level deeper; Left
//! and Escape go back up, handing the key to `on_escape` at the primary.
//! Executing an item without a submenu runs `on_execute`.

mod layered_state;
mod menu_pathing;

use std::rc::Rc;

use alloy_component::{
    Behaviour, ComponentId, ComponentSpec, EventKind, SimulatedEvent, System, handler,
};
use alloy_dom::ElementId;
use alloy_keying::{FocusHook, KeyHandler, keying};
use alloy_schema::field::strict_of;
use alloy_schema::{Value, handle_of};
use hashbrown::HashMap;

pub use layered_state::LayeredState;
use layered_state::MenuPrep;

use crate::behaviours::highlighting::{self, highlighting};
use crate::behaviours::replacing::{self, replacing};
use crate::behaviours::transitioning::{self, transitioning, tristate};
use crate::hooks::{ItemAction, MenuHook, SubmenuHook};
use crate::menu::{ITEM_CLASS, MENU_CLASS, MenuItem, item_value, menu};

/// Behaviour name.
pub const TIERED_MENU: &str = "tiered_menu";
/// Class of the container element.
pub const TIERED_MENU_CLASS: &str = "alloy-tiered-menu";
/// Class of the active menu.
pub const SELECTED_MENU_CLASS: &str = "alloy-selected-menu";
/// Class of open menus behind the active one.
pub const BACKGROUND_MENU_CLASS: &str = "alloy-background-menu";

/// Transition state of a menu slid out towards the start.
pub const BEFORE: &str = "before";
/// Transition state of the visible menu.
pub const CURRENT: &str = "current";
/// Transition state of a menu waiting towards the end.
pub const AFTER: &str = "after";
/// Class present while a menu slides.
pub const SLIDING_CLASS: &str = "transitioning";

/// The menus of a tiered menu.
#[derive(Clone, Debug, Default)]
pub struct TieredData {
    /// Name of the menu shown first.
    pub primary: String,
    /// Every menu, by name.
    pub menus: Vec<(String, Vec<MenuItem>)>,
    /// Item value to the name of the submenu it opens.
    pub expansions: Vec<(String, String)>,
}

/// Callbacks of a tiered menu.
#[derive(Clone, Debug, Default)]
pub struct TieredHooks {
    /// An item without a submenu was executed.
    pub on_execute: Option<ItemAction>,
    /// Left or Escape at the primary menu.
    pub on_escape: Option<ItemAction>,
    /// The primary menu opened.
    pub on_open_menu: Option<MenuHook>,
    /// An item opened its submenu.
    pub on_open_submenu: Option<SubmenuHook>,
    /// A submenu closed back to the item that opened it.
    pub on_collapse_menu: Option<SubmenuHook>,
}

/// What to build with [`tiered_menu`].
#[derive(Clone, Debug, Default)]
pub struct TieredMenuSpec {
    /// The menus.
    pub data: TieredData,
    /// The callbacks.
    pub hooks: TieredHooks,
    /// Keep closed menus in the document instead of detaching them.
    pub stay_in_dom: bool,
    /// Slide menus with `transitioning`; implies `stay_in_dom`.
    pub sliding: bool,
}

fn define() -> Rc<Behaviour> {
    Behaviour::define(TIERED_MENU)
        .fields(vec![strict_of("setup", handle_of::<TieredMenuSpec>())])
        .state(|_| LayeredState::default())
        .events(|_| {
            vec![
                handler::run_on_attached(|system, me| {
                    if !state(system, me).is_some_and(LayeredState::is_set_up) {
                        set_up(system, me);
                    }
                }),
                handler::run_on_execute(on_execute),
                handler::run(EventKind::Tap, |system, me, event| {
                    let item = system
                        .doc()
                        .closest(event.target(), &format!(".{ITEM_CLASS}"), Some(me.element()));
                    if let Some(item) = item
                        && let Some(owner) = owning_menu(system, item)
                    {
                        highlighting::highlight(system, owner, item);
                        system.dispatch(me, item, EventKind::Execute);
                        event.stop();
                    }
                }),
            ]
        })
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The behaviour driving a tiered menu container.
pub fn tiered_menu_behaviour() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

fn settings(system: &System, container: ComponentId) -> Option<TieredMenuSpec> {
    tiered_menu_behaviour()
        .config(system, container)?
        .handle::<TieredMenuSpec>("setup")
        .cloned()
}

/// The container's menu bookkeeping.
pub fn state(system: &System, container: ComponentId) -> Option<&LayeredState> {
    tiered_menu_behaviour().state::<LayeredState>(system, container)
}

fn state_mut(system: &mut System, container: ComponentId) -> Option<&mut LayeredState> {
    tiered_menu_behaviour().state_mut::<LayeredState>(system, container)
}

/// Build a tiered menu container.
pub fn tiered_menu(spec: TieredMenuSpec) -> ComponentSpec {
    ComponentSpec::new("div")
        .class(TIERED_MENU_CLASS)
        .with(&tiered_menu_behaviour(), Value::object([("setup", Value::handle(spec))]))
        .with(
            &highlighting(),
            Value::object([
                ("highlight_class", Value::from(SELECTED_MENU_CLASS)),
                ("item_class", Value::from(MENU_CLASS)),
            ]),
        )
        .with(&replacing(), Value::empty_object())
        .with(
            &keying(),
            Value::object([
                ("mode", Value::from("special")),
                (
                    "on_right",
                    KeyHandler::value(|system, me, _| {
                        if focus_in_text_input(system) {
                            return None;
                        }
                        expand_right(system, me).then_some(true)
                    }),
                ),
                ("on_left", KeyHandler::value(go_back)),
                ("on_escape", KeyHandler::value(go_back)),
                (
                    "focus_in",
                    FocusHook::value(|system, me| {
                        let Some(active) = get_active_menu(system, me) else {
                            return false;
                        };
                        system.dispatch_focus(active);
                        true
                    }),
                ),
            ]),
        )
}

/// Hooks that slide menus in and out, for menus built with `sliding`.
///
/// The primary lands in `current`. Opening a submenu slides its parent to
/// `before` and the submenu in from `after`; collapsing reverses that.
pub fn sliding_hooks() -> TieredHooks {
    TieredHooks {
        on_open_menu: Some(MenuHook::new(|system, _, menu| {
            transitioning::jump_to(system, menu, CURRENT);
        })),
        on_open_submenu: Some(SubmenuHook::new(|system, _, item, submenu| {
            if let Some(parent) = owning_menu(system, item.element()) {
                transitioning::progress_to(system, parent, BEFORE);
            }
            transitioning::jump_to(system, submenu, AFTER);
            transitioning::progress_to(system, submenu, CURRENT);
        })),
        on_collapse_menu: Some(SubmenuHook::new(|system, _, item, submenu| {
            transitioning::progress_to(system, submenu, AFTER);
            if let Some(parent) = owning_menu(system, item.element()) {
                transitioning::progress_to(system, parent, CURRENT);
            }
        })),
        ..TieredHooks::default()
    }
}

fn focus_in_text_input(system: &System) -> bool {
    let doc = system.doc();
    doc.focused()
        .and_then(|f| doc.tag(f))
        .is_some_and(|tag| tag == "input" || tag == "textarea")
}

fn owning_menu(system: &System, item: ElementId) -> Option<ComponentId> {
    let menu = system.doc().closest(item, &format!(".{MENU_CLASS}"), None)?;
    system.get_by_dom(menu)
}

fn menu_spec(name: &str, items: &[MenuItem], sliding: bool) -> ComponentSpec {
    let spec = menu(name, items);
    if !sliding {
        return spec;
    }
    spec.with(
        &transitioning(),
        Value::object([
            ("initial_state", Value::from(AFTER)),
            ("routes", tristate(BEFORE, CURRENT, AFTER, SLIDING_CLASS)),
        ]),
    )
}

fn set_up(system: &mut System, container: ComponentId) {
    let Some(setup) = settings(system, container) else {
        return;
    };
    let data = &setup.data;
    let directory: HashMap<String, Vec<String>> = data
        .menus
        .iter()
        .map(|(name, items)| (name.clone(), items.iter().map(|i| i.value.clone()).collect()))
        .collect();
    let menus: HashMap<String, MenuPrep> = data
        .menus
        .iter()
        .map(|(name, items)| {
            let spec = menu_spec(name, items, setup.sliding);
            (name.clone(), MenuPrep::NotBuilt(spec))
        })
        .collect();
    let expansions = data.expansions.iter().cloned().collect();
    let Some(MenuPrep::NotBuilt(primary_spec)) = menus.get(&data.primary).cloned() else {
        tracing::error!(primary = %data.primary, "tiered menu has no primary menu");
        return;
    };
    let Some(state) = state_mut(system, container) else {
        return;
    };
    state.set_contents(&data.primary, menus, expansions, &directory);

    let primary = match replacing::append(system, container, primary_spec) {
        Ok(Some(primary)) => primary,
        Ok(None) => return,
        Err(err) => {
            tracing::error!(%err, "cannot build the primary menu");
            return;
        }
    };
    if let Some(state) = state_mut(system, container) {
        state.set_menu_built(&data.primary, primary);
    }
    highlighting::highlight(system, container, primary.element());
    highlighting::highlight_first(system, primary);
    if let Some(hook) = &setup.hooks.on_open_menu {
        hook.call(system, container, primary);
    }
}

/// The built menu `name`, building it on first use.
fn built_menu(system: &mut System, container: ComponentId, name: &str) -> Option<ComponentId> {
    let prep = state(system, container)?.lookup_menu(name)?.clone();
    match prep {
        MenuPrep::Prepared(menu) => Some(menu),
        MenuPrep::NotBuilt(spec) => match system.build(spec) {
            Ok(menu) => {
                state_mut(system, container)?.set_menu_built(name, menu);
                Some(menu)
            }
            Err(err) => {
                tracing::error!(menu = name, %err, "cannot build a submenu");
                None
            }
        },
    }
}

/// Show `path`: its first menu active, the rest in the background, every
/// other built menu closed.
fn update_menu_path(system: &mut System, container: ComponentId, path: &[String]) -> Option<ComponentId> {
    let stay_in_dom = settings(system, container).is_some_and(|s| s.stay_in_dom || s.sliding);
    let (active_name, rest) = path.split_first()?;
    let active = built_menu(system, container, active_name)?;
    for name in rest {
        if let Some(menu) = built_menu(system, container, name) {
            system.doc_mut().add_class(menu.element(), BACKGROUND_MENU_CLASS);
        }
    }
    system
        .doc_mut()
        .remove_class(active.element(), BACKGROUND_MENU_CLASS);
    highlighting::highlight(system, container, active.element());
    if system.doc().has_focus_within(container.element()) {
        system.doc_mut().focus(active.element());
    }

    let others = state(system, container)?.other_menus(path);
    for other in others {
        system
            .doc_mut()
            .remove_class(other.element(), BACKGROUND_MENU_CLASS);
        if !stay_in_dom && system.doc().in_body(other.element()) {
            replacing::remove(system, container, other);
        }
    }
    Some(active)
}

fn active_item_element(system: &System, container: ComponentId) -> Option<ElementId> {
    let menu = get_active_menu(system, container)?;
    highlighting::get_highlighted(system, menu)
}

fn expand_right(system: &mut System, container: ComponentId) -> bool {
    let Some(item) = active_item_element(system, container) else {
        return false;
    };
    expand_item(system, container, item)
}

fn expand_item(system: &mut System, container: ComponentId, item: ElementId) -> bool {
    let Some(value) = item_value(system.doc(), item).map(str::to_owned) else {
        return false;
    };
    let Some(path) = state(system, container).and_then(|s| s.expand(&value)) else {
        return false;
    };
    let Some(submenu) = built_menu(system, container, &path[0]) else {
        return false;
    };
    if !system.doc().in_body(submenu.element())
        && let Err(err) = replacing::append(system, container, submenu)
    {
        tracing::error!(%err, "cannot attach a submenu");
        return false;
    }
    system.doc_mut().set_attr(item, "aria-expanded", "true");
    let hooks = settings(system, container).map(|s| s.hooks).unwrap_or_default();
    if let (Some(hook), Some(item)) = (&hooks.on_open_submenu, system.get_by_dom(item)) {
        hook.call(system, container, item, submenu);
    }
    highlighting::highlight_first(system, submenu);
    update_menu_path(system, container, &path);
    tracing::debug!(item = %value, menu = %path[0], "expanded");
    true
}

fn collapse_left(system: &mut System, container: ComponentId) -> bool {
    let Some(collapsing) = get_active_menu(system, container) else {
        return false;
    };
    let Some(value) = active_item_element(system, container)
        .and_then(|item| item_value(system.doc(), item))
        .map(str::to_owned)
    else {
        return false;
    };
    let Some(path) = state(system, container).and_then(|s| s.collapse(&value)) else {
        return false;
    };
    let Some(parent) = update_menu_path(system, container, &path) else {
        return false;
    };
    let Some(opener) = highlighting::get_highlighted(system, parent) else {
        return true;
    };
    system.doc_mut().set_attr(opener, "aria-expanded", "false");
    let hooks = settings(system, container).map(|s| s.hooks).unwrap_or_default();
    if let (Some(hook), Some(opener)) = (&hooks.on_collapse_menu, system.get_by_dom(opener)) {
        hook.call(system, container, opener, collapsing);
    }
    true
}

fn go_back(system: &mut System, container: ComponentId, _: &SimulatedEvent) -> Option<bool> {
    if collapse_left(system, container) {
        return Some(true);
    }
    let hook = settings(system, container)?.hooks.on_escape?;
    let item = get_active_item(system, container)?;
    hook.call(system, container, item).then_some(true)
}

fn on_execute(system: &mut System, container: ComponentId, event: &mut SimulatedEvent) {
    let item = event.target();
    if !system.doc().has_class(item, ITEM_CLASS) {
        return;
    }
    if expand_item(system, container, item) {
        event.stop();
        return;
    }
    let Some(hook) = settings(system, container).and_then(|s| s.hooks.on_execute) else {
        return;
    };
    if let Some(item) = system.get_by_dom(item)
        && hook.call(system, container, item)
    {
        event.stop();
    }
}

/// Open the active item's submenu. Returns true if one opened.
pub fn expand(system: &mut System, container: ComponentId) -> bool {
    expand_right(system, container)
}

/// Close the active submenu. Returns false at the primary menu.
pub fn collapse_menu(system: &mut System, container: ComponentId) -> bool {
    collapse_left(system, container)
}

/// Close every submenu and highlight the first item of the primary menu.
pub fn highlight_primary(system: &mut System, container: ComponentId) {
    let Some(primary) = state(system, container)
        .and_then(LayeredState::primary)
        .map(str::to_owned)
    else {
        return;
    };
    if let Some(menu) = update_menu_path(system, container, &[primary]) {
        highlighting::highlight_first(system, menu);
    }
}

/// Redraw the path of the active item without changing depth.
pub fn refresh(system: &mut System, container: ComponentId) {
    let Some(value) = active_item_element(system, container)
        .and_then(|item| item_value(system.doc(), item))
        .map(str::to_owned)
    else {
        return;
    };
    if let Some(path) = state(system, container).and_then(|s| s.refresh(&value)) {
        update_menu_path(system, container, &path);
    }
}

/// The menu holding the container's highlight.
pub fn get_active_menu(system: &System, container: ComponentId) -> Option<ComponentId> {
    let menu = highlighting::get_highlighted(system, container)?;
    system.get_by_dom(menu)
}

/// The highlighted item of the active menu.
pub fn get_active_item(system: &System, container: ComponentId) -> Option<ComponentId> {
    let item = active_item_element(system, container)?;
    system.get_by_dom(item)
}

/// Throw away every built menu and start again from the primary.
pub fn reset(system: &mut System, container: ComponentId) {
    let Some(state) = state_mut(system, container) else {
        return;
    };
    let built = state.built_menus();
    state.clear();
    for menu in built {
        system.destroy(menu);
    }
    set_up(system, container);
}
