// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `keying` behaviour and its API.

use std::rc::Rc;

use alloy_component::{Behaviour, Binding, ComponentId, EventHandler, EventKind, System, handler};
use alloy_schema::field::option_of;
use alloy_schema::{FieldProcessor, Struct, handle_of};

use crate::focus_manager::{self, FocusManager, FocusManagerHandle};
use crate::modes::execution::{self, ExecutionConfig};
use crate::modes::flatgrid::{self, FlatGridConfig, GridSize};
use crate::modes::flow::{self, FlowConfig};
use crate::modes::matrix::{self, MatrixConfig};
use crate::modes::menu::{self, MenuConfig};
use crate::modes::special::{self, SpecialConfig};
use crate::modes::tabbing::{self, TabbingConfig};
use crate::navigation::WrapMode;
use crate::rules::{self, Rule};

/// Behaviour name.
pub const KEYING: &str = "keying";

/// A validated keying configuration, one variant per mode.
#[derive(Clone, Debug)]
pub enum KeyingConfig {
    /// `acyclic` ([`WrapMode::Never`]) or `cyclic` ([`WrapMode::Cycle`]).
    Tabbing(Rc<TabbingConfig>),
    /// `flow`.
    Flow(Rc<FlowConfig>),
    /// `flatgrid`.
    FlatGrid(Rc<FlatGridConfig>),
    /// `matrix`.
    Matrix(Rc<MatrixConfig>),
    /// `menu`.
    Menu(Rc<MenuConfig>),
    /// `execution`.
    Execution(Rc<ExecutionConfig>),
    /// `special`.
    Special(Rc<SpecialConfig>),
}

impl KeyingConfig {
    /// Read a config validated by the [`keying`] schema.
    pub fn from_struct(config: &Struct) -> Option<Self> {
        Some(match config.str("mode")? {
            "acyclic" => Self::Tabbing(Rc::new(TabbingConfig::from_struct(config, WrapMode::Never))),
            "cyclic" => Self::Tabbing(Rc::new(TabbingConfig::from_struct(config, WrapMode::Cycle))),
            "flow" => Self::Flow(Rc::new(FlowConfig::from_struct(config))),
            "flatgrid" => Self::FlatGrid(Rc::new(FlatGridConfig::from_struct(config))),
            "matrix" => Self::Matrix(Rc::new(MatrixConfig::from_struct(config))),
            "menu" => Self::Menu(Rc::new(MenuConfig::from_struct(config))),
            "execution" => Self::Execution(Rc::new(ExecutionConfig::from_struct(config))),
            "special" => Self::Special(Rc::new(SpecialConfig::from_struct(config))),
            _ => return None,
        })
    }

    /// The mode name.
    pub fn mode(&self) -> &'static str {
        match self {
            Self::Tabbing(c) if c.wrap == WrapMode::Cycle => "cyclic",
            Self::Tabbing(_) => "acyclic",
            Self::Flow(_) => "flow",
            Self::FlatGrid(_) => "flatgrid",
            Self::Matrix(_) => "matrix",
            Self::Menu(_) => "menu",
            Self::Execution(_) => "execution",
            Self::Special(_) => "special",
        }
    }

    fn keydown_rules(&self, focus: &Rc<dyn FocusManager>) -> Vec<Rule> {
        match self {
            Self::Tabbing(c) => tabbing::rules(c, focus),
            Self::Flow(c) => flow::rules(c, focus),
            Self::FlatGrid(c) => flatgrid::rules(c, focus),
            Self::Matrix(c) => matrix::rules(c, focus),
            Self::Menu(c) => menu::rules(c, focus),
            Self::Execution(c) => execution::rules(c),
            Self::Special(c) => special::rules(c),
        }
    }

    fn keyup_rules(&self) -> Vec<Rule> {
        match self {
            Self::Flow(_) => flow::keyup_rules(),
            Self::FlatGrid(_) => flatgrid::keyup_rules(),
            Self::Menu(_) => menu::keyup_rules(),
            Self::Execution(c) => execution::keyup_rules(c),
            Self::Tabbing(_) | Self::Matrix(_) | Self::Special(_) => Vec::new(),
        }
    }

    fn has_focus_in(&self) -> bool {
        match self {
            Self::Execution(_) => false,
            Self::Special(c) => c.focus_in.is_some(),
            _ => true,
        }
    }

    /// Move focus into the component. Returns true if the mode has a
    /// focus-in step and it ran.
    fn focus_in(&self, focus: &dyn FocusManager, system: &mut System, component: ComponentId) -> bool {
        match self {
            Self::Tabbing(c) => tabbing::focus_in(c, focus, system, component),
            Self::Flow(c) => flow::focus_in(c, focus, system, component),
            Self::FlatGrid(c) => flatgrid::focus_in(c, focus, system, component),
            Self::Matrix(c) => matrix::focus_in(c, focus, system, component),
            Self::Menu(c) => menu::focus_in(c, focus, system, component),
            Self::Execution(_) => return false,
            Self::Special(c) => return special::focus_in(c, system, component),
        }
        true
    }
}

/// Per-component keying state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyingState {
    grid: Option<GridSize>,
}

impl KeyingState {
    fn from_config(config: &Struct) -> Self {
        let grid = match config.str("mode") {
            Some("flatgrid") => GridSize::from_struct(config),
            _ => None,
        };
        Self { grid }
    }

    /// The current grid size of a `flatgrid` component.
    pub fn grid_size(&self) -> Option<GridSize> {
        self.grid
    }
}

fn with_focus_manager(mut fields: Vec<FieldProcessor>) -> Vec<FieldProcessor> {
    fields.push(option_of("focus_manager", handle_of::<FocusManagerHandle>()));
    fields
}

fn events(config: &Struct) -> Vec<Binding> {
    let Some(keying) = KeyingConfig::from_struct(config) else {
        return Vec::new();
    };
    let focus = focus_manager::from_config(config);
    let keydown = keying.keydown_rules(&focus);
    let keyup = keying.keyup_rules();

    let mut bindings = vec![handler::run(EventKind::KeyDown, move |system, me, event| {
        rules::handle(&keydown, system, me, event);
    })];
    if !keyup.is_empty() {
        bindings.push(handler::run(EventKind::KeyUp, move |system, me, event| {
            rules::handle(&keyup, system, me, event);
        }));
    }
    if keying.has_focus_in() {
        bindings.push((
            EventKind::Focus,
            EventHandler::run_on_source(move |system, me, event| {
                if keying.focus_in(&*focus, system, me) {
                    event.stop();
                }
            }),
        ));
    }
    bindings
}

fn define() -> Rc<Behaviour> {
    Behaviour::modal(KEYING, "mode")
        .branch("acyclic", with_focus_manager(tabbing::fields()))
        .branch("cyclic", with_focus_manager(tabbing::fields()))
        .branch("flow", with_focus_manager(flow::fields()))
        .branch("flatgrid", with_focus_manager(flatgrid::fields()))
        .branch("matrix", with_focus_manager(matrix::fields()))
        .branch("menu", with_focus_manager(menu::fields()))
        .branch("execution", with_focus_manager(execution::fields()))
        .branch("special", with_focus_manager(special::fields()))
        .state(KeyingState::from_config)
        .events(events)
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The keying behaviour.
///
/// Configure it with `{ "mode": ..., ...mode fields }`.
pub fn keying() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

/// Run the component's focus-in step, as an [`EventKind::Focus`] on the
/// component would.
pub fn focus_in(system: &mut System, component: ComponentId) {
    let Some(config) = keying().config(system, component) else {
        return;
    };
    let Some(mode) = KeyingConfig::from_struct(&config) else {
        return;
    };
    let focus = focus_manager::from_config(&config);
    mode.focus_in(&*focus, system, component);
}

/// Set the grid size of a `flatgrid` component. Other modes log an error and
/// ignore the call.
pub fn set_grid_size(system: &mut System, component: ComponentId, rows: usize, columns: usize) {
    let Some(config) = keying().config(system, component) else {
        return;
    };
    if config.str("mode") != Some("flatgrid") {
        tracing::error!(
            mode = config.str("mode").unwrap_or_default(),
            component = %system.describe(component),
            "set_grid_size is only supported by flatgrid keying"
        );
        return;
    }
    if let Some(state) = keying().state_mut::<KeyingState>(system, component) {
        state.grid = Some(GridSize { rows, columns });
    }
}

/// The grid size of a `flatgrid` component.
pub fn grid_size(system: &System, component: ComponentId) -> Option<GridSize> {
    keying()
        .state::<KeyingState>(system, component)
        .and_then(KeyingState::grid_size)
}

/// The component's keying config.
pub fn keying_config(system: &System, component: ComponentId) -> Option<KeyingConfig> {
    KeyingConfig::from_struct(&keying().config(system, component)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::testing::container;
    use alloy_component::ComponentSpec;
    use alloy_schema::Value;

    #[test]
    fn unknown_modes_fail_the_build() {
        let mut system = System::default();
        let err = system.build(
            ComponentSpec::new("div").with(&keying(), Value::object([("mode", Value::from("spiral"))])),
        );
        assert!(err.is_err());
        let err = system.build(
            ComponentSpec::new("div").with(&keying(), Value::object([("mode", Value::from("menu"))])),
        );
        assert!(err.is_err(), "menu needs a selector");
    }

    #[test]
    fn grid_api_is_ignored_outside_flatgrid() {
        let mut system = System::default();
        let (c, _) = container(
            &mut system,
            2,
            Value::object([("mode", Value::from("flow")), ("selector", Value::from(".item"))]),
        );
        set_grid_size(&mut system, c, 1, 2);
        assert_eq!(grid_size(&system, c), None);
        assert_eq!(keying_config(&system, c).map(|k| k.mode()), Some("flow"));
    }

    #[test]
    fn focus_event_on_the_container_focuses_in() {
        let mut system = System::default();
        let (c, items) = container(
            &mut system,
            2,
            Value::object([("mode", Value::from("menu")), ("selector", Value::from(".item"))]),
        );
        system.dispatch_focus(c);
        assert_eq!(system.doc().focused(), Some(items[0]));
    }

    #[test]
    fn init_size_seeds_the_grid() {
        let mut system = System::default();
        let config = Value::object([
            ("mode", Value::from("flatgrid")),
            ("selector", Value::from(".item")),
            (
                "init_size",
                Value::object([("rows", Value::from(2)), ("columns", Value::from(2))]),
            ),
        ]);
        let (c, _) = container(&mut system, 4, config);
        assert_eq!(grid_size(&system, c), Some(GridSize { rows: 2, columns: 2 }));
        set_grid_size(&mut system, c, 1, 4);
        assert_eq!(grid_size(&system, c), Some(GridSize { rows: 1, columns: 4 }));
    }
}
