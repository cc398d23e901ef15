// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Which menus a tiered menu has built, and how they nest.

use alloy_component::{ComponentId, ComponentSpec};
use hashbrown::HashMap;

use super::menu_pathing;

/// A menu, either built or waiting to be.
#[derive(Clone, Debug)]
pub(crate) enum MenuPrep {
    Prepared(ComponentId),
    NotBuilt(ComponentSpec),
}

/// State of the `tiered_menu` behaviour.
#[derive(Clone, Debug, Default)]
pub struct LayeredState {
    primary: Option<String>,
    menus: HashMap<String, MenuPrep>,
    expansions: HashMap<String, String>,
    paths: HashMap<String, Vec<String>>,
}

impl LayeredState {
    /// Forget every menu.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Record the menus; `directory` maps each menu to its item values.
    pub(crate) fn set_contents(
        &mut self,
        primary: &str,
        menus: HashMap<String, MenuPrep>,
        expansions: HashMap<String, String>,
        directory: &HashMap<String, Vec<String>>,
    ) {
        self.paths = menu_pathing::generate(directory, &expansions);
        self.primary = Some(primary.to_owned());
        self.menus = menus;
        self.expansions = expansions;
    }

    /// The name of the primary menu, once set up.
    pub fn primary(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// Returns true if the contents have been set.
    pub fn is_set_up(&self) -> bool {
        self.primary.is_some()
    }

    /// The submenu `item` opens.
    pub fn expansion(&self, item: &str) -> Option<&str> {
        self.expansions.get(item).map(String::as_str)
    }

    /// The menu path after opening `item`'s submenu: the submenu first.
    pub fn expand(&self, item: &str) -> Option<Vec<String>> {
        let submenu = self.expansions.get(item)?;
        let mut path = vec![submenu.clone()];
        path.extend(self.paths.get(item)?.iter().cloned());
        Some(path)
    }

    /// The menu path after closing `item`'s menu, or `None` at the primary.
    pub fn collapse(&self, item: &str) -> Option<Vec<String>> {
        let path = self.paths.get(item)?;
        (path.len() > 1).then(|| path[1..].to_vec())
    }

    /// The menu path that shows `item`.
    pub fn refresh(&self, item: &str) -> Option<Vec<String>> {
        self.paths.get(item).cloned()
    }

    pub(crate) fn lookup_menu(&self, name: &str) -> Option<&MenuPrep> {
        self.menus.get(name)
    }

    pub(crate) fn set_menu_built(&mut self, name: &str, menu: ComponentId) {
        self.menus.insert(name.to_owned(), MenuPrep::Prepared(menu));
    }

    /// Built menus not on `path`, sorted by name.
    pub(crate) fn other_menus(&self, path: &[String]) -> Vec<ComponentId> {
        let mut others: Vec<(&String, ComponentId)> = self
            .menus
            .iter()
            .filter(|(name, _)| !path.contains(*name))
            .filter_map(|(name, prep)| match prep {
                MenuPrep::Prepared(c) => Some((name, *c)),
                MenuPrep::NotBuilt(_) => None,
            })
            .collect();
        others.sort_by(|a, b| a.0.cmp(b.0));
        others.into_iter().map(|(_, c)| c).collect()
    }

    /// Every built menu.
    pub(crate) fn built_menus(&self) -> Vec<ComponentId> {
        self.other_menus(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> LayeredState {
        let mut state = LayeredState::default();
        let menus = [("A", "div"), ("B", "div")]
            .into_iter()
            .map(|(name, tag)| (name.to_owned(), MenuPrep::NotBuilt(ComponentSpec::new(tag))))
            .collect();
        let expansions = HashMap::from([("x".to_owned(), "B".to_owned())]);
        let directory = HashMap::from([
            ("A".to_owned(), vec!["x".to_owned()]),
            ("B".to_owned(), vec!["y".to_owned()]),
        ]);
        state.set_contents("A", menus, expansions, &directory);
        state
    }

    fn path(names: &[&str]) -> Option<Vec<String>> {
        Some(names.iter().map(|s| (*s).to_owned()).collect())
    }

    #[test]
    fn expand_and_collapse_follow_the_paths() {
        let state = state();
        assert_eq!(state.primary(), Some("A"));
        assert_eq!(state.expand("x"), path(&["B", "A"]));
        assert_eq!(state.expand("y"), None);
        assert_eq!(state.collapse("y"), path(&["A"]));
        assert_eq!(state.collapse("x"), None);
        assert_eq!(state.refresh("y"), path(&["B", "A"]));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut state = state();
        assert!(state.is_set_up());
        state.clear();
        assert!(!state.is_set_up());
        assert!(state.lookup_menu("A").is_none());
    }
}
