// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paths from items back to the primary menu.

use hashbrown::{HashMap, HashSet};

/// For every item, the chain of menus from the item's own menu back to the
/// primary.
///
/// `menus` maps each menu to the values of its items; `expansions` maps an
/// item to the submenu it opens. An item whose menu cannot be traced maps to
/// its own menu alone. Cycles in `expansions` end the trace.
pub(crate) fn generate(
    menus: &HashMap<String, Vec<String>>,
    expansions: &HashMap<String, String>,
) -> HashMap<String, Vec<String>> {
    let owner: HashMap<&str, &str> = menus
        .iter()
        .flat_map(|(menu, items)| items.iter().map(move |i| (i.as_str(), menu.as_str())))
        .collect();
    // submenu -> the item that opens it
    let opened_by: HashMap<&str, &str> = expansions
        .iter()
        .map(|(item, menu)| (menu.as_str(), item.as_str()))
        .collect();

    let path_of = |menu: &str| {
        let mut path = vec![menu.to_owned()];
        let mut seen: HashSet<&str> = [menu].into_iter().collect();
        let mut cur = menu;
        while let Some(parent) = opened_by.get(cur).and_then(|item| owner.get(item)) {
            if !seen.insert(*parent) {
                break;
            }
            path.push((*parent).to_owned());
            cur = parent;
        }
        path
    };

    owner
        .iter()
        .map(|(item, menu)| ((*item).to_owned(), path_of(menu)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map<const N: usize, V: Clone>(entries: [(&str, V); N]) -> HashMap<String, V> {
        entries.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn items_trace_back_to_the_primary() {
        let menus = map([
            ("file", strings(&["new", "recent"])),
            ("recent", strings(&["a", "more"])),
            ("more", strings(&["b"])),
        ]);
        let expansions = map([
            ("recent", "recent".to_owned()),
            ("more", "more".to_owned()),
        ]);
        let paths = generate(&menus, &expansions);
        assert_eq!(paths["new"], strings(&["file"]));
        assert_eq!(paths["a"], strings(&["recent", "file"]));
        assert_eq!(paths["b"], strings(&["more", "recent", "file"]));
        assert_eq!(paths.len(), 5);
    }

    #[test]
    fn cycles_end_the_trace() {
        let menus = map([("x", strings(&["to-y"])), ("y", strings(&["to-x"]))]);
        let expansions = map([("to-y", "y".to_owned()), ("to-x", "x".to_owned())]);
        let paths = generate(&menus, &expansions);
        assert_eq!(paths["to-y"], strings(&["x", "y"]));
        assert_eq!(paths["to-x"], strings(&["y", "x"]));
    }
}
