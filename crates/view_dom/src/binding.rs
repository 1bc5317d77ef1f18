//! Typed view-binding layer.
//!
//! A page controller declares its logical targets as an enum implementing
//! [`ViewTarget`]. [`Bindings::bind`] resolves every target once at startup:
//! missing required targets fail, missing optional targets are recorded and
//! every later operation on them is a no-op.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

use crate::document::{Document, NodeKey};

/// Binding error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A target the controller cannot work without is absent
    #[error("Required view target {target} (#{element_id}) not found in document")]
    MissingTarget {
        target: String,
        element_id: &'static str,
    },
}

/// Logical view name resolved to an element by id.
pub trait ViewTarget: Copy + Eq + Hash + Debug + 'static {
    /// Every target the controller binds
    const ALL: &'static [Self];

    /// Id of the element this target renders into
    fn element_id(self) -> &'static str;

    /// Whether binding fails when the element is absent
    fn required(self) -> bool {
        false
    }
}

/// Resolved targets for one document.
#[derive(Debug, Clone)]
pub struct Bindings<T: ViewTarget> {
    resolved: HashMap<T, NodeKey>,
    missing: Vec<T>,
}

impl<T: ViewTarget> Bindings<T> {
    /// Resolve every target of `T` against `doc`
    pub fn bind(doc: &Document) -> Result<Self, BindingError> {
        let mut resolved = HashMap::new();
        let mut missing = Vec::new();

        for &target in T::ALL {
            match doc.get_by_id(target.element_id()) {
                Some(key) => {
                    resolved.insert(target, key);
                }
                None if target.required() => {
                    return Err(BindingError::MissingTarget {
                        target: format!("{:?}", target),
                        element_id: target.element_id(),
                    });
                }
                None => {
                    tracing::warn!(
                        target_name = ?target,
                        element_id = target.element_id(),
                        "View target not found, operations on it will be skipped"
                    );
                    missing.push(target);
                }
            }
        }

        tracing::debug!(
            bound = resolved.len(),
            missing = missing.len(),
            "View bindings resolved"
        );
        Ok(Self { resolved, missing })
    }

    /// Element bound to `target`, if present in the document
    pub fn get(&self, target: T) -> Option<NodeKey> {
        self.resolved.get(&target).copied()
    }

    pub fn is_bound(&self, target: T) -> bool {
        self.resolved.contains_key(&target)
    }

    /// Optional targets that were absent at bind time
    pub fn missing(&self) -> &[T] {
        &self.missing
    }
}
