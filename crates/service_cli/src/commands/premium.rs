//! Premium command implementation
//!
//! Fills the premium form for one insurance branch and prints the request
//! body it would submit.

use tracing::info;
use view_branch::{premium_form_document, Branch, BranchSelector, PremiumPayload};
use view_dom::{NodeKey, Selector};

use crate::{CliError, Result};

fn parse_assignment(assignment: &str) -> Result<(&str, &str)> {
    assignment
        .split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| {
            CliError::InvalidArgument(format!("Expected name=value, got '{}'", assignment))
        })
}

/// Premium request for `branch` with the given `name=value` assignments.
///
/// Only fields enabled for the branch can be set; checkboxes accept
/// `true`/`false`.
pub fn build_payload(branch: &str, assignments: &[String]) -> Result<PremiumPayload> {
    let branch: Branch = branch
        .parse()
        .map_err(|e: view_branch::UnknownBranch| CliError::InvalidArgument(e.to_string()))?;

    let mut selector = BranchSelector::init(premium_form_document())?;
    selector.select_branch(branch);

    for assignment in assignments {
        let (name, value) = parse_assignment(assignment)?;
        let doc = selector.document_mut();
        let field = Selector::name(name).and(Selector::tag("input").or(Selector::tag("select")));
        let enabled: Vec<NodeKey> = doc
            .query_all(&field)
            .into_iter()
            .filter(|key| !doc.get(*key).is_disabled())
            .collect();
        if enabled.is_empty() {
            return Err(CliError::InvalidArgument(format!(
                "No field '{}' for branch {}",
                name, branch
            )));
        }
        for key in enabled {
            if doc.get(key).attr("type") == Some("checkbox") {
                doc.set_checked(key, matches!(value, "true" | "on" | "1"));
            } else {
                doc.set_value(key, value);
            }
        }
    }

    Ok(selector.premium_payload())
}

/// Run the premium command
pub fn run(branch: &str, assignments: &[String]) -> Result<()> {
    info!("Building premium request...");
    info!("  Branch: {}", branch);

    let payload = build_payload(branch, assignments)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
