// Copyright 2025 the Alloy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset.
//!
//! Supported: type selectors and `*`, `.class`, `#id`, `[attr]`,
//! `[attr="value"]` (quotes optional), `:not(compound)`, the descendant
//! combinator (whitespace), the child combinator (`>`) and comma-separated
//! lists.

use crate::document::Document;
use crate::error::DomError;
use crate::types::ElementId;

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    /// Subject last; each entry records the combinator linking it to the next.
    steps: Vec<(Compound, Combinator)>,
    subject: Compound,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
    negations: Vec<Compound>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.ids.is_empty()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.negations.is_empty()
    }

    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        if !doc.is_alive(id) {
            return false;
        }
        if let Some(tag) = &self.tag
            && doc.tag(id) != Some(tag.as_str())
        {
            return false;
        }
        self.ids.iter().all(|i| doc.attr(id, "id") == Some(i.as_str()))
            && self.classes.iter().all(|c| doc.has_class(id, c))
            && self.attrs.iter().all(|(name, expected)| match expected {
                Some(v) => doc.attr(id, name) == Some(v.as_str()),
                None => doc.has_attr(id, name),
            })
            && self.negations.iter().all(|n| !n.matches(doc, id))
    }
}

impl Complex {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.subject.matches(doc, id) && self.steps_match(doc, id, self.steps.len())
    }

    /// Match `steps[..upto]` against the ancestors of `id`.
    fn steps_match(&self, doc: &Document, id: ElementId, upto: usize) -> bool {
        if upto == 0 {
            return true;
        }
        let (compound, combinator) = &self.steps[upto - 1];
        match combinator {
            Combinator::Child => doc.parent_of(id).is_some_and(|p| {
                compound.matches(doc, p) && self.steps_match(doc, p, upto - 1)
            }),
            Combinator::Descendant => {
                let mut cur = doc.parent_of(id);
                while let Some(p) = cur {
                    if compound.matches(doc, p) && self.steps_match(doc, p, upto - 1) {
                        return true;
                    }
                    cur = doc.parent_of(p);
                }
                false
            }
        }
    }
}

impl Selector {
    /// Parse a selector list.
    pub fn parse(source: &str) -> Result<Self, DomError> {
        let mut alternatives = Vec::new();
        for part in split_top_level(source) {
            alternatives.push(parse_complex(source, part.trim())?);
        }
        if alternatives.is_empty() {
            return Err(invalid(source, "empty selector"));
        }
        Ok(Self { alternatives })
    }

    /// Parse, logging and discarding failures.
    pub(crate) fn parse_or_log(source: &str) -> Option<Self> {
        match Self::parse(source) {
            Ok(s) => Some(s),
            Err(err) => {
                tracing::error!(%err, "selector ignored");
                None
            }
        }
    }

    /// Returns true if `id` matches any alternative.
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, id))
    }
}

fn invalid(source: &str, reason: &str) -> DomError {
    DomError::InvalidSelector {
        selector: source.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Split on commas outside brackets and parentheses.
fn split_top_level(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in source.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[' | '(') => depth += 1,
            (None, ']' | ')') => depth -= 1,
            (None, ',') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

fn parse_complex(source: &str, text: &str) -> Result<Complex, DomError> {
    let mut chars = text.chars().peekable();
    let mut compounds: Vec<Compound> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut pending: Option<Combinator> = None;

    loop {
        let mut saw_space = false;
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
            saw_space = true;
        }
        match chars.peek() {
            None => break,
            Some('>') => {
                chars.next();
                pending = Some(Combinator::Child);
                continue;
            }
            Some(_) => {}
        }
        if !compounds.is_empty() {
            let combinator = match (pending.take(), saw_space) {
                (Some(c), _) => c,
                (None, true) => Combinator::Descendant,
                (None, false) => return Err(invalid(source, "unexpected character")),
            };
            combinators.push(combinator);
        } else if pending.is_some() {
            return Err(invalid(source, "combinator without a left-hand side"));
        }
        compounds.push(parse_compound(source, &mut chars)?);
    }

    if pending.is_some() {
        return Err(invalid(source, "dangling combinator"));
    }
    let Some(subject) = compounds.pop() else {
        return Err(invalid(source, "empty selector"));
    };
    let steps = compounds.into_iter().zip(combinators).collect();
    Ok(Complex { steps, subject })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if is_ident_char(c) {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    out
}

fn parse_compound(
    source: &str,
    chars: &mut core::iter::Peekable<core::str::Chars<'_>>,
) -> Result<Compound, DomError> {
    let mut compound = Compound::default();
    if chars.peek() == Some(&'*') {
        chars.next();
    } else if chars.peek().is_some_and(|c| is_ident_char(*c)) {
        compound.tag = Some(read_ident(chars));
    }
    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err(invalid(source, "empty class name"));
                }
                compound.classes.push(name);
            }
            '#' => {
                chars.next();
                let name = read_ident(chars);
                if name.is_empty() {
                    return Err(invalid(source, "empty id"));
                }
                compound.ids.push(name);
            }
            '[' => {
                chars.next();
                compound.attrs.push(parse_attr(source, chars)?);
            }
            ':' => {
                chars.next();
                let pseudo = read_ident(chars);
                if pseudo != "not" || chars.next() != Some('(') {
                    return Err(invalid(source, "only :not(...) is supported"));
                }
                let mut inner = String::new();
                let mut depth = 1;
                for ch in chars.by_ref() {
                    match ch {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    inner.push(ch);
                }
                if depth != 0 {
                    return Err(invalid(source, "unclosed :not("));
                }
                let mut inner_chars = inner.trim().chars().peekable();
                let negated = parse_compound(source, &mut inner_chars)?;
                if inner_chars.next().is_some() || negated.is_empty() {
                    return Err(invalid(source, ":not takes one compound selector"));
                }
                compound.negations.push(negated);
            }
            _ => break,
        }
    }
    // A bare `*` is an empty compound and matches everything.
    Ok(compound)
}

fn parse_attr(
    source: &str,
    chars: &mut core::iter::Peekable<core::str::Chars<'_>>,
) -> Result<(String, Option<String>), DomError> {
    let name = read_ident(chars);
    if name.is_empty() {
        return Err(invalid(source, "empty attribute name"));
    }
    match chars.next() {
        Some(']') => Ok((name, None)),
        Some('=') => {
            let value = match chars.peek() {
                Some(&q) if q == '"' || q == '\'' => {
                    chars.next();
                    let mut v = String::new();
                    loop {
                        match chars.next() {
                            Some(c) if c == q => break,
                            Some(c) => v.push(c),
                            None => return Err(invalid(source, "unterminated string")),
                        }
                    }
                    v
                }
                _ => read_ident(chars),
            };
            if chars.next() != Some(']') {
                return Err(invalid(source, "expected ]"));
            }
            Ok((name, Some(value)))
        }
        _ => Err(invalid(source, "malformed attribute selector")),
    }
}
