// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event kinds, raw payloads and the per-dispatch simulated event.

use alloy_dom::ElementId;
use alloy_schema::Value;

/// Every event Alloy dispatches.
///
/// System kinds carry the reserved `alloy.*` names; the rest mirror native
/// input events. [`EventKind::Tap`] is an alias resolved once per
/// [`System`](crate::System) from [`SystemConfig::touch`](crate::SystemConfig::touch).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `alloy.focus`: a component is asked to take logical focus.
    Focus,
    /// `alloy.blur.post`: fired once focus has settled after a native focus-out.
    PostBlur,
    /// `alloy.execute`: the component's primary action.
    Execute,
    /// `alloy.receive`: a broadcast message.
    Receive,
    /// `alloy.system.init`: the component was added to a system.
    SystemInit,
    /// `alloy.system.attached`: the component's element was connected.
    Attached,
    /// `alloy.system.detached`: the component's element is being disconnected.
    Detached,
    /// `alloy.tap`: a tap on touch devices, a click elsewhere.
    Tap,
    /// `alloy.longpress`
    LongPress,
    /// `alloy.sandbox.close`
    SandboxClose,
    /// `alloy.change.tab`
    ChangeTab,
    /// `alloy.focus.item`
    FocusItem,
    /// `alloy.highlight`
    Highlight,
    /// `alloy.dehighlight`
    Dehighlight,
    /// Native `keydown`.
    KeyDown,
    /// Native `keyup`.
    KeyUp,
    /// Native `click`.
    Click,
    /// Native `mousedown`.
    MouseDown,
    /// Native `mouseup`.
    MouseUp,
    /// Native `mouseover`.
    MouseOver,
    /// Native `touchstart`.
    TouchStart,
    /// Native `touchmove`.
    TouchMove,
    /// Native `touchend`.
    TouchEnd,
    /// Native `focusin`.
    FocusIn,
    /// Native `focusout`.
    FocusOut,
    /// Native `input`.
    Input,
    /// Native `transitionend`.
    TransitionEnd,
    /// An application-defined event.
    Custom(&'static str),
}

impl EventKind {
    const NAMED: [Self; 27] = [
        Self::Focus,
        Self::PostBlur,
        Self::Execute,
        Self::Receive,
        Self::SystemInit,
        Self::Attached,
        Self::Detached,
        Self::Tap,
        Self::LongPress,
        Self::SandboxClose,
        Self::ChangeTab,
        Self::FocusItem,
        Self::Highlight,
        Self::Dehighlight,
        Self::KeyDown,
        Self::KeyUp,
        Self::Click,
        Self::MouseDown,
        Self::MouseUp,
        Self::MouseOver,
        Self::TouchStart,
        Self::TouchMove,
        Self::TouchEnd,
        Self::FocusIn,
        Self::FocusOut,
        Self::Input,
        Self::TransitionEnd,
    ];

    /// The wire name of the event.
    pub fn name(self) -> &'static str {
        match self {
            Self::Focus => "alloy.focus",
            Self::PostBlur => "alloy.blur.post",
            Self::Execute => "alloy.execute",
            Self::Receive => "alloy.receive",
            Self::SystemInit => "alloy.system.init",
            Self::Attached => "alloy.system.attached",
            Self::Detached => "alloy.system.detached",
            Self::Tap => "alloy.tap",
            Self::LongPress => "alloy.longpress",
            Self::SandboxClose => "alloy.sandbox.close",
            Self::ChangeTab => "alloy.change.tab",
            Self::FocusItem => "alloy.focus.item",
            Self::Highlight => "alloy.highlight",
            Self::Dehighlight => "alloy.dehighlight",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Click => "click",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseOver => "mouseover",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::Input => "input",
            Self::TransitionEnd => "transitionend",
            Self::Custom(name) => name,
        }
    }

    /// Look up a built-in kind by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED.into_iter().find(|k| k.name() == name)
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0000_0001;
        /// Control.
        const CTRL  = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command.
        const META  = 0b0000_1000;
    }
}

/// A keyboard event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// Legacy `keyCode` of the key.
    pub key_code: u32,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn new(key_code: u32) -> Self {
        Self {
            key_code,
            modifiers: Modifiers::empty(),
        }
    }

    /// The same key with `modifiers` held.
    pub fn with(mut self, modifiers: Modifiers) -> Self {
        self.modifiers |= modifiers;
        self
    }

    /// Shift held.
    pub fn shift(self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Control held.
    pub fn ctrl(self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// A broadcast payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Delivered to every channel of every receiver.
    pub universal: bool,
    /// Target channels, when not universal.
    pub channels: Vec<String>,
    /// The data each channel validates.
    pub data: Value,
}

/// The raw payload behind a simulated event.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RawEvent {
    /// No payload (synthetic events such as `alloy.execute`).
    #[default]
    None,
    /// A key press.
    Key(KeyEvent),
    /// A pointer position.
    Pointer {
        /// Horizontal coordinate.
        x: f64,
        /// Vertical coordinate.
        y: f64,
    },
    /// A broadcast message.
    Message(Message),
    /// A focus request.
    Focus {
        /// Element that asked for the focus change.
        originator: Option<ElementId>,
    },
    /// Arbitrary data.
    Data(Value),
}

/// The dispatch-time wrapper around a raw event.
///
/// Handlers call [`stop`](Self::stop) to end propagation and report the event
/// handled, or [`cut`](Self::cut) to end propagation silently.
#[derive(Clone, Debug)]
pub struct SimulatedEvent {
    kind: EventKind,
    raw: RawEvent,
    target: ElementId,
    source: ElementId,
    stopped: bool,
    cut: bool,
}

impl SimulatedEvent {
    /// A fresh event aimed at `target`.
    pub fn new(kind: EventKind, raw: RawEvent, target: ElementId) -> Self {
        Self {
            kind,
            raw,
            target,
            source: target,
            stopped: false,
            cut: false,
        }
    }

    /// Which event this is.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The raw payload.
    pub fn raw(&self) -> &RawEvent {
        &self.raw
    }

    /// The element the event was dispatched at.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The logical source; starts as the target and may be redirected.
    pub fn source(&self) -> ElementId {
        self.source
    }

    /// Redirect the logical source.
    pub fn set_source(&mut self, source: ElementId) {
        self.source = source;
    }

    /// End propagation; the dispatch reports the event as handled.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// End propagation without reporting the event as handled.
    pub fn cut(&mut self) {
        self.cut = true;
    }

    /// Returns true once [`stop`](Self::stop) was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Returns true once [`cut`](Self::cut) was called.
    pub fn is_cut(&self) -> bool {
        self.cut
    }

    /// The key payload, if any.
    pub fn key(&self) -> Option<KeyEvent> {
        match &self.raw {
            RawEvent::Key(k) => Some(*k),
            _ => None,
        }
    }

    /// The broadcast payload, if any.
    pub fn message(&self) -> Option<&Message> {
        match &self.raw {
            RawEvent::Message(m) => Some(m),
            _ => None,
        }
    }

    /// The data payload, if any.
    pub fn data(&self) -> Option<&Value> {
        match &self.raw {
            RawEvent::Data(v) => Some(v),
            _ => None,
        }
    }
}
