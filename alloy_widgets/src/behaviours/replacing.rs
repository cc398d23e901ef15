// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `replacing`: swap the child components of a component at runtime.

use std::rc::Rc;

use alloy_component::{Behaviour, BuildError, ComponentId, ComponentSpec, System};

/// Behaviour name.
pub const REPLACING: &str = "replacing";

/// New content for a replacing component.
#[derive(Debug)]
pub enum Content {
    /// Built on insertion.
    Spec(ComponentSpec),
    /// Already built; reattached as is.
    Premade(ComponentId),
}

impl From<ComponentSpec> for Content {
    fn from(spec: ComponentSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<ComponentId> for Content {
    fn from(component: ComponentId) -> Self {
        Self::Premade(component)
    }
}

impl Content {
    fn realize(self, system: &mut System) -> Result<ComponentId, BuildError> {
        match self {
            Self::Spec(spec) => system.build(spec),
            Self::Premade(component) => Ok(component),
        }
    }
}

thread_local! {
    static BEHAVIOUR: Rc<Behaviour> = Behaviour::define(REPLACING).build();
}

/// The replacing behaviour. It takes no config.
pub fn replacing() -> Rc<Behaviour> {
    BEHAVIOUR.with(Rc::clone)
}

fn check(system: &System, component: ComponentId) -> bool {
    replacing().config(system, component).is_some()
}

/// Replace every child with `contents`, returning the new children.
///
/// Old children are detached, not destroyed, so they can come back as
/// [`Content::Premade`].
pub fn set(
    system: &mut System,
    component: ComponentId,
    contents: impl IntoIterator<Item = Content>,
) -> Result<Vec<ComponentId>, BuildError> {
    if !check(system, component) {
        return Ok(Vec::new());
    }
    system.detach_children(component);
    contents
        .into_iter()
        .map(|content| {
            let child = content.realize(system)?;
            system.attach(component, child)?;
            Ok(child)
        })
        .collect()
}

/// Add `content` after the existing children.
pub fn append(
    system: &mut System,
    component: ComponentId,
    content: impl Into<Content>,
) -> Result<Option<ComponentId>, BuildError> {
    if !check(system, component) {
        return Ok(None);
    }
    let child = content.into().realize(system)?;
    system.attach(component, child)?;
    Ok(Some(child))
}

/// Add `content` before the existing children.
pub fn prepend(
    system: &mut System,
    component: ComponentId,
    content: impl Into<Content>,
) -> Result<Option<ComponentId>, BuildError> {
    if !check(system, component) {
        return Ok(None);
    }
    let child = content.into().realize(system)?;
    system.attach_at(component, 0, child)?;
    Ok(Some(child))
}

/// Replace the child at `index` with `content`, or just remove it when
/// `content` is `None`. An index past the end changes nothing.
pub fn replace_at(
    system: &mut System,
    component: ComponentId,
    index: usize,
    content: Option<Content>,
) -> Result<Option<ComponentId>, BuildError> {
    if !check(system, component) {
        return Ok(None);
    }
    let Some(&old) = system.children(component).get(index) else {
        return Ok(None);
    };
    let position = system
        .doc()
        .children_of(component.element())
        .iter()
        .position(|&el| el == old.element())
        .unwrap_or(index);
    system.detach(old);
    let Some(content) = content else {
        return Ok(None);
    };
    let child = content.realize(system)?;
    system.attach_at(component, position, child)?;
    Ok(Some(child))
}

/// Detach `child` if it belongs to the component.
pub fn remove(system: &mut System, component: ComponentId, child: ComponentId) {
    if check(system, component) && system.children(component).contains(&child) {
        system.detach(child);
    }
}

/// The current children.
pub fn contents(system: &System, component: ComponentId) -> Vec<ComponentId> {
    system.children(component).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_schema::Value;

    fn holder(system: &mut System) -> ComponentId {
        let c = system
            .build(ComponentSpec::new("div").with(&replacing(), Value::empty_object()))
            .unwrap();
        system.attach_to_body(c).unwrap();
        c
    }

    fn tagged(name: &str) -> ComponentSpec {
        ComponentSpec::new("span").uid(name)
    }

    fn uids(system: &System, c: ComponentId) -> Vec<String> {
        contents(system, c)
            .iter()
            .filter_map(|&child| system.uid_of(child).map(|u| u.as_str().to_owned()))
            .collect()
    }

    #[test]
    fn set_append_prepend() {
        let mut system = System::default();
        let c = holder(&mut system);
        set(&mut system, c, [Content::from(tagged("a")), Content::from(tagged("b"))]).unwrap();
        assert_eq!(uids(&system, c), vec!["a", "b"]);

        append(&mut system, c, tagged("c")).unwrap();
        prepend(&mut system, c, tagged("z")).unwrap();
        assert_eq!(uids(&system, c), vec!["z", "a", "b", "c"]);

        let old = contents(&system, c);
        set(&mut system, c, [Content::from(tagged("only"))]).unwrap();
        assert_eq!(uids(&system, c), vec!["only"]);
        assert!(!system.is_in_world(old[0]));
        assert!(system.contains(old[0]), "detached, not destroyed");
    }

    #[test]
    fn premade_content_comes_back() {
        let mut system = System::default();
        let c = holder(&mut system);
        let kept = system.build(tagged("kept")).unwrap();
        append(&mut system, c, kept).unwrap();
        remove(&mut system, c, kept);
        assert!(contents(&system, c).is_empty());
        assert!(!system.is_in_world(kept));

        append(&mut system, c, kept).unwrap();
        assert_eq!(contents(&system, c), vec![kept]);
        assert_eq!(system.get_by_uid("kept"), Some(kept));
    }

    #[test]
    fn replace_at_keeps_the_position() {
        let mut system = System::default();
        let c = holder(&mut system);
        set(
            &mut system,
            c,
            [Content::from(tagged("a")), Content::from(tagged("b")), Content::from(tagged("c"))],
        )
        .unwrap();
        replace_at(&mut system, c, 1, Some(tagged("x").into())).unwrap();
        assert_eq!(uids(&system, c), vec!["a", "x", "c"]);
        replace_at(&mut system, c, 0, None).unwrap();
        assert_eq!(uids(&system, c), vec!["x", "c"]);
        assert_eq!(replace_at(&mut system, c, 9, None).unwrap(), None);
    }

    #[test]
    fn build_failures_surface() {
        let mut system = System::default();
        let c = holder(&mut system);
        append(&mut system, c, tagged("dup")).unwrap();
        assert!(append(&mut system, c, tagged("dup")).is_err());
    }
}
