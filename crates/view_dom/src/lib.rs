//! # view_dom: Headless Document Model
//!
//! ## View Layer Foundation
//!
//! view_dom is the bottom of the view layer. Page controllers never touch a
//! browser directly; they mutate a [`Document`] the same way a page script
//! mutates the DOM:
//! - Element tree with ids, classes, attributes, values and form state (`document`)
//! - Typed selectors instead of string queries (`selector`)
//! - Logical view targets bound to concrete elements, validated at startup (`binding`)
//! - HTML escaping for rendered fragments (`escape`)
//!
//! ## Usage Examples
//!
//! ```rust
//! use view_dom::{Document, Node, Selector};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! doc.append(root, Node::new("div").id("loading").class("hidden"));
//!
//! let loading = doc.get_by_id("loading").unwrap();
//! doc.show(loading);
//! assert!(!doc.is_hidden(loading));
//! assert_eq!(doc.query_all(&Selector::class("hidden")).len(), 0);
//! ```

pub mod binding;
pub mod document;
pub mod escape;
pub mod selector;

pub use binding::{BindingError, Bindings, ViewTarget};
pub use document::{Document, Element, Node, NodeKey, HIDDEN_CLASS};
pub use escape::escape_html;
pub use selector::Selector;
