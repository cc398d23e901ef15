// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=alloy_component --heading-base-level=0

//! Alloy Component: behaviour composition, component lifecycle and bubbling
//! event dispatch.
//!
//! ## Overview
//!
//! A component is built from a [`ComponentSpec`]: a DOM definition, child
//! specs, and any number of [`Behaviour`] configurations. Each behaviour
//! validates its own config, creates its own state, contributes a
//! [`DomModification`](alloy_dom::DomModification) and registers handlers.
//! [`System::build`] checks all of it up front; a build either fully succeeds
//! or leaves nothing behind.
//!
//! ## Handler ordering
//!
//! When two behaviours handle the same [`EventKind`] their handlers are fused
//! in the order the spec gives with [`ComponentSpec::order`] (or the built-in
//! [`default_event_order`]). A missing ordering is a build error, never a
//! silent guess.
//!
//! ## Dispatch
//!
//! [`System::trigger`] bubbles an event from its target. A handler may
//! [`stop`](SimulatedEvent::stop) it (handled) or [`cut`](SimulatedEvent::cut)
//! it (not handled); otherwise dispatch climbs from the handling element's
//! parent. [`System::broadcast`] delivers a [`Message`] to every
//! [`EventKind::Receive`] handler. An optional [`EventMonitor`] records every
//! dispatch step.
//!
//! ## Lifecycle
//!
//! [`System::attach`] registers a component and fires
//! [`EventKind::Attached`] children first; [`System::detach`] fires
//! [`EventKind::Detached`] parent first, then unregisters.
//!
//! ```rust
//! use alloy_component::{Behaviour, ComponentSpec, EventKind, System, handler};
//! use alloy_dom::DomModification;
//! use alloy_schema::{Value, field};
//!
//! let pressing = Behaviour::define("pressing")
//!     .fields(vec![field::defaulted("label", Value::from("Press"))])
//!     .state(|_| 0_u32)
//!     .exhibit(|config| {
//!         DomModification::default().with_inner_html(config.str("label").unwrap_or_default())
//!     })
//!     .events(|_| {
//!         vec![handler::run(EventKind::Execute, |system, me, event| {
//!             if let Some(n) = system.state_of_mut::<u32>(me, "pressing") {
//!                 *n += 1;
//!             }
//!             event.stop();
//!         })]
//!     })
//!     .build();
//!
//! let mut system = System::default();
//! let button = system
//!     .build(ComponentSpec::new("button").with(&pressing, Value::empty_object()))
//!     .unwrap();
//! system.attach_to_body(button).unwrap();
//!
//! assert_eq!(system.doc().inner_html(button.element()), Some("Press"));
//! assert!(system.emit_execute(button));
//! assert_eq!(pressing.state::<u32>(&system, button), Some(&1));
//! ```

mod behaviour;
mod composite;
mod config;
mod error;
mod event;
pub mod handler;
mod monitor;
mod registry;
mod router;
mod spec;
mod system;
mod uid;

pub use behaviour::{Behaviour, BehaviourBuilder, BehaviourRegistry, ModalBuilder};
pub use composite::{Composite, PartSpec, PartType};
pub use config::SystemConfig;
pub use error::{BuildError, PartError, RegistryError};
pub use event::{EventKind, KeyEvent, Message, Modifiers, RawEvent, SimulatedEvent};
pub use handler::{BASE_BEHAVIOUR, Binding, EventHandler, default_event_order};
pub use monitor::{DispatchTrace, EventMonitor, TraceOutcome, TraceStep};
pub use router::DispatchOutcome;
pub use spec::{ApiFn, ChildSpec, ComponentSpec};
pub use system::{ComponentId, System};
pub use uid::{UID_ATTR, Uid};
