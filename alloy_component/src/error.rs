// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build, registry and composite-part errors.

use alloy_dom::MergeConflicts;
use alloy_schema::ValidationError;
use thiserror::Error;

use crate::event::EventKind;

/// Why a component could not be built.
#[derive(Clone, Debug, Error)]
pub enum BuildError {
    /// A behaviour configuration, part configuration or JSON spec was invalid.
    #[error(transparent)]
    Config(#[from] ValidationError),
    /// Behaviours contributed conflicting DOM aspects.
    #[error(transparent)]
    DomConflict(#[from] MergeConflicts),
    /// Several behaviours handle one event and no ordering names them.
    #[error(
        "The event ({}) has more than one behaviour that listens to it: [{}].\nWhen this occurs, you must specify an event ordering for the behaviours in your spec",
        .kind.name(),
        .behaviours.join(", ")
    )]
    MissingEventOrder {
        /// The contested event.
        kind: EventKind,
        /// The behaviours handling it.
        behaviours: Vec<String>,
    },
    /// An event ordering leaves out behaviours that handle the event.
    #[error("The ordering for event ({}) does not have an entry for [{}]", .kind.name(), .missing.join(", "))]
    IncompleteEventOrder {
        /// The event.
        kind: EventKind,
        /// Handling behaviours absent from the ordering.
        missing: Vec<String>,
    },
    /// A JSON spec named a behaviour the registry does not know.
    #[error("Unknown behaviour: {0}")]
    UnknownBehaviour(String),
    /// A JSON spec named an event that does not exist.
    #[error("Unknown event: {0}")]
    UnknownEvent(String),
    /// A part placeholder reached the builder unsubstituted.
    #[error("Placeholder for part \"{name}\" of {owner} was never substituted")]
    UnresolvedPlaceholder {
        /// The composite owning the part.
        owner: String,
        /// The part.
        name: String,
    },
    /// Composite parts could not be resolved.
    #[error(transparent)]
    Part(#[from] PartError),
    /// Registering the built component failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Registry failures. Each one is a programming error surfaced immediately.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Two distinct components share a uid.
    #[error(
        "The uid \"{uid}\" is already used by: {existing}\nCannot use it for: {incoming}\nThe conflicting element is{} already in the DOM",
        dom_note(.existing_in_dom)
    )]
    DuplicateUid {
        /// The contested uid.
        uid: String,
        /// Description of the registered element.
        existing: String,
        /// Description of the element being registered.
        incoming: String,
        /// Whether the registered element is connected.
        existing_in_dom: bool,
    },
}

fn dom_note(in_dom: &bool) -> &'static str {
    if *in_dom { "" } else { " not" }
}

/// Composite part resolution failures.
#[derive(Clone, Debug, Error)]
pub enum PartError {
    /// A required part was not supplied.
    #[error("Part \"{name}\" is required by {owner} but was not supplied")]
    MissingPart {
        /// The composite.
        owner: String,
        /// The part.
        name: String,
    },
    /// Parts were supplied that the composite does not declare.
    #[error("{owner} does not declare the parts: [{}]", .names.join(", "))]
    UndeclaredParts {
        /// The composite.
        owner: String,
        /// The unknown parts.
        names: Vec<String>,
    },
    /// Required parts have no placeholder in the composite's components.
    #[error("Placeholders could not be found for {owner}: [{}]", .names.join(", "))]
    UnusedPlaceholders {
        /// The composite.
        owner: String,
        /// The parts without placeholders.
        names: Vec<String>,
    },
    /// A part configuration failed validation.
    #[error(transparent)]
    Config(#[from] ValidationError),
}
