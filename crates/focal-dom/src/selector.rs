//! Element Query
//!
//! Simple and compound selectors for querySelector-style lookups:
//! `tag`, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`, compounds such as
//! `button.primary[type=submit]`, and comma-separated lists.

use crate::{DomError, DomResult, ElementData};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attr { name: String, value: Option<String> },
    Universal,
}

impl SimpleSelector {
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.tag.eq_ignore_ascii_case(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.has_class(class),
            Self::Attr { name, value: None } => element.has_attr(name),
            Self::Attr { name, value: Some(value) } => element.get_attr(name) == Some(value.as_str()),
        }
    }
}

/// All parts must match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    pub parts: Vec<SimpleSelector>,
}

impl CompoundSelector {
    pub fn matches(&self, element: &ElementData) -> bool {
        self.parts.iter().all(|p| p.matches(element))
    }
}

/// Selector list: any compound may match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub alternatives: Vec<CompoundSelector>,
}

impl Selector {
    pub fn parse(input: &str) -> DomResult<Self> {
        let alternatives = input
            .split(',')
            .map(|part| parse_compound(part.trim()).ok_or_else(|| DomError::InvalidSelector(input.to_string())))
            .collect::<DomResult<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

impl std::str::FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> DomResult<Self> {
        Self::parse(s)
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    (!ident.is_empty()).then_some(ident)
}

fn parse_compound(s: &str) -> Option<CompoundSelector> {
    if s.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    let mut chars = s.chars().peekable();

    match chars.peek() {
        Some('*') => {
            chars.next();
            parts.push(SimpleSelector::Universal);
        }
        Some(&c) if is_ident_char(c) => {
            parts.push(SimpleSelector::Tag(take_ident(&mut chars)?.to_ascii_lowercase()));
        }
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => parts.push(SimpleSelector::Id(take_ident(&mut chars)?)),
            '.' => parts.push(SimpleSelector::Class(take_ident(&mut chars)?)),
            '[' => parts.push(parse_attr(&mut chars)?),
            _ => return None,
        }
    }
    Some(CompoundSelector { parts })
}

fn parse_attr(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<SimpleSelector> {
    let mut body = String::new();
    loop {
        match chars.next()? {
            ']' => break,
            c => body.push(c),
        }
    }
    let (name, value) = match body.split_once('=') {
        Some((name, value)) => {
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                .unwrap_or(value);
            (name.trim(), Some(unquoted.to_string()))
        }
        None => (body.trim(), None),
    };
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    Some(SimpleSelector::Attr {
        name: name.to_ascii_lowercase(),
        value,
    })
}
