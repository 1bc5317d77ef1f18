//! Typed element selectors.
//!
//! Each variant mirrors one piece of CSS selector syntax the page
//! controllers need; composition replaces string concatenation.

use crate::document::{Document, NodeKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#id`
    Id(String),
    /// `tag`
    Tag(String),
    /// `.class`
    Class(String),
    /// `[name="..."]`
    Name(String),
    /// `[attr]`
    HasAttr(String),
    /// `[attr="value"]`
    AttrEq(String, String),
    /// `:checked`
    Checked,
    /// Compound selector: every part matches the same element
    All(Vec<Selector>),
    /// Selector list `a, b`
    Any(Vec<Selector>),
    /// `ancestor subject`
    Descendant {
        ancestor: Box<Selector>,
        subject: Box<Selector>,
    },
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into().to_lowercase())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn has_attr(attr: impl Into<String>) -> Self {
        Self::HasAttr(attr.into())
    }

    pub fn attr_eq(attr: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AttrEq(attr.into(), value.into())
    }

    /// `[data-key]`
    pub fn has_data(key: &str) -> Self {
        Self::has_attr(format!("data-{}", key))
    }

    /// `[data-key="value"]`
    pub fn data_eq(key: &str, value: impl Into<String>) -> Self {
        Self::attr_eq(format!("data-{}", key), value)
    }

    /// Narrow this selector with another condition on the same element
    pub fn and(self, other: Selector) -> Self {
        match self {
            Self::All(mut parts) => {
                parts.push(other);
                Self::All(parts)
            }
            first => Self::All(vec![first, other]),
        }
    }

    /// Widen this selector into a selector list
    pub fn or(self, other: Selector) -> Self {
        match self {
            Self::Any(mut parts) => {
                parts.push(other);
                Self::Any(parts)
            }
            first => Self::Any(vec![first, other]),
        }
    }

    /// Match only elements nested inside an element matching `ancestor`
    pub fn inside(self, ancestor: Selector) -> Self {
        Self::Descendant {
            ancestor: Box::new(ancestor),
            subject: Box::new(self),
        }
    }

    /// Whether the element at `key` matches
    pub fn matches(&self, doc: &Document, key: NodeKey) -> bool {
        let element = doc.get(key);
        match self {
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Tag(tag) => element.tag() == tag,
            Self::Class(class) => element.has_class(class),
            Self::Name(name) => element.name() == Some(name.as_str()),
            Self::HasAttr(attr) => element.attr(attr).is_some(),
            Self::AttrEq(attr, value) => element.attr(attr) == Some(value.as_str()),
            Self::Checked => element.is_checked(),
            Self::All(parts) => parts.iter().all(|part| part.matches(doc, key)),
            Self::Any(parts) => parts.iter().any(|part| part.matches(doc, key)),
            Self::Descendant { ancestor, subject } => {
                if !subject.matches(doc, key) {
                    return false;
                }
                let mut current = element.parent();
                while let Some(parent) = current {
                    if ancestor.matches(doc, parent) {
                        return true;
                    }
                    current = doc.get(parent).parent();
                }
                false
            }
        }
    }
}
