// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event registry: which registered component handles which event.

use std::rc::Rc;

use hashbrown::HashMap;

use crate::event::EventKind;
use crate::handler::EventHandler;
use crate::system::ComponentId;
use crate::uid::Uid;

/// A handler found for a component.
#[derive(Clone, Debug)]
pub(crate) struct Registered {
    pub(crate) component: ComponentId,
    pub(crate) handler: Rc<EventHandler>,
}

/// Per-kind handler tables keyed by uid.
///
/// Registration order is kept so that broadcasts reach receivers
/// deterministically.
#[derive(Debug, Default)]
pub(crate) struct EventRegistry {
    by_kind: HashMap<EventKind, HashMap<Uid, Registered>>,
    order: Vec<Uid>,
}

impl EventRegistry {
    pub(crate) fn register(
        &mut self,
        uid: &Uid,
        component: ComponentId,
        handlers: &HashMap<EventKind, Rc<EventHandler>>,
    ) {
        self.unregister(uid);
        for (kind, handler) in handlers {
            self.by_kind.entry(*kind).or_default().insert(
                uid.clone(),
                Registered {
                    component,
                    handler: handler.clone(),
                },
            );
        }
        self.order.push(uid.clone());
    }

    pub(crate) fn unregister(&mut self, uid: &Uid) {
        for table in self.by_kind.values_mut() {
            table.remove(uid);
        }
        self.order.retain(|u| u != uid);
    }

    pub(crate) fn find(&self, kind: EventKind, uid: &str) -> Option<&Registered> {
        self.by_kind.get(&kind)?.get(uid)
    }

    /// Every handler for `kind`, in registration order.
    pub(crate) fn filter(&self, kind: EventKind) -> Vec<Registered> {
        let Some(table) = self.by_kind.get(&kind) else {
            return Vec::new();
        };
        self.order
            .iter()
            .filter_map(|uid| table.get(uid).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_dom::Document;

    #[test]
    fn register_filter_unregister() {
        let mut doc = Document::new();
        let a = ComponentId::new(doc.create_element("a"));
        let b = ComponentId::new(doc.create_element("b"));
        let mut handlers = HashMap::new();
        handlers.insert(EventKind::Receive, Rc::new(EventHandler::default()));

        let mut reg = EventRegistry::default();
        reg.register(&Uid::from("b"), b, &handlers);
        reg.register(&Uid::from("a"), a, &handlers);
        let found: Vec<_> = reg.filter(EventKind::Receive).iter().map(|r| r.component).collect();
        assert_eq!(found, vec![b, a]);
        assert!(reg.find(EventKind::Receive, "a").is_some());
        assert!(reg.find(EventKind::Click, "a").is_none());

        reg.unregister(&Uid::from("b"));
        assert_eq!(reg.filter(EventKind::Receive).len(), 1);
        assert!(reg.find(EventKind::Receive, "b").is_none());
    }
}
