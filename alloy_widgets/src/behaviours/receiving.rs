// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `receiving`: handle broadcasts on named channels.
//!
//! Each channel has an `on_receive` handler and, optionally, a `schema`
//! ([`Processor`]) its data must pass. Data that fails the schema is logged
//! and skipped; the remaining channels still run.

use std::rc::Rc;

use alloy_component::{Behaviour, EventKind, handler};
use alloy_schema::field::{option_of, strict_of};
use alloy_schema::{Object, Processor, Value, as_raw, handle_of, obj, set_of};

use crate::hooks::ReceiveHandler;

/// Behaviour name.
pub const RECEIVING: &str = "receiving";

struct Channel {
    name: String,
    on_receive: ReceiveHandler,
    schema: Option<Processor>,
}

fn channels_of(channels: &Object) -> Vec<Channel> {
    channels
        .iter()
        .filter_map(|(name, spec)| {
            let on_receive = spec
                .get("on_receive")
                .and_then(Value::as_handle)
                .and_then(|h| h.downcast_ref::<ReceiveHandler>())?
                .clone();
            let schema = spec
                .get("schema")
                .and_then(Value::as_handle)
                .and_then(|h| h.downcast_ref::<Processor>())
                .cloned();
            Some(Channel {
                name: name.clone(),
                on_receive,
                schema,
            })
        })
        .collect()
}

fn define() -> Rc<Behaviour> {
    Behaviour::define(RECEIVING)
        .fields(vec![strict_of(
            "channels",
            set_of(
                |key| match key.as_str() {
                    Some(name) if !name.is_empty() => Ok(key.clone()),
                    _ => Err("channel names must be non-empty".to_owned()),
                },
                obj(vec![
                    strict_of("on_receive", handle_of::<ReceiveHandler>()),
                    option_of("schema", handle_of::<Processor>()),
                ]),
            ),
        )])
        .events(|config| {
            let channels = config.object("channels").map(channels_of).unwrap_or_default();
            vec![handler::run(EventKind::Receive, move |system, me, event| {
                let Some(message) = event.message().cloned() else {
                    return;
                };
                for channel in &channels {
                    if !message.universal && !message.channels.contains(&channel.name) {
                        continue;
                    }
                    let data = match &channel.schema {
                        Some(schema) => match as_raw(&channel.name, schema, &message.data) {
                            Ok(data) => data,
                            Err(errors) => {
                                tracing::warn!(
                                    channel = %channel.name,
                                    component = %system.describe(me),
                                    errors = errors.len(),
                                    "broadcast data failed the channel schema"
                                );
                                continue;
                            }
                        },
                        None => message.data.clone(),
                    };
                    channel.on_receive.call(system, me, &data);
                }
            })]
        })
        .build()
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = define();
}

/// The receiving behaviour.
///
/// Config: `{ "channels": { name: channel(..) } }`.
pub fn receiving() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

/// One channel's config: a handler and an optional data schema.
pub fn channel(on_receive: ReceiveHandler, schema: Option<Processor>) -> Value {
    let mut entries = vec![("on_receive", Value::from(on_receive))];
    if let Some(schema) = schema {
        entries.push(("schema", Value::handle(schema)));
    }
    Value::object(entries)
}
