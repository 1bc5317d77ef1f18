//! # view_branch: Premium Form Branch Selector
//!
//! Keeps the premium calculation form consistent with the selected
//! insurance branch: only the active branch section is visible and only its
//! fields are enabled, so only they are submitted.
//!
//! ## Branches
//! - `vie`: life insurance ("Assurance Vie")
//! - `non_vie`: property and casualty ("Assurance Non-Vie")
//! - `obligatoire`: mandatory covers ("Assurance Obligatoire")
//!
//! ## Usage Examples
//!
//! ```rust
//! use view_branch::{premium_form_document, Branch, BranchSelector};
//!
//! let mut selector = BranchSelector::init(premium_form_document()).unwrap();
//! assert_eq!(selector.active(), Branch::Vie);
//!
//! selector.select_branch(Branch::NonVie);
//! let payload = selector.premium_payload();
//! assert_eq!(payload.calculation_type, "Assurance Non-Vie");
//! ```

mod branch;
mod controller;
mod payload;
mod template;

pub use branch::{Branch, UnknownBranch};
pub use controller::{BranchSelector, BranchTarget, SUBMITTING_LABEL};
pub use payload::PremiumPayload;
pub use template::premium_form_document;
