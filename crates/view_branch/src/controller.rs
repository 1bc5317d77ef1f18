//! Branch selector controller.

use view_dom::{BindingError, Bindings, Document, NodeKey, Selector, ViewTarget};

use crate::branch::Branch;
use crate::payload::PremiumPayload;

/// Submit button content while a calculation is in flight
pub const SUBMITTING_LABEL: &str = "<i class=\"fas fa-spinner fa-spin\"></i> Calcul en cours...";

const BRANCH_OPTION_CLASS: &str = "branch-option";
const BRANCH_SECTION_CLASS: &str = "branch-section";
const ACTIVE_CLASS: &str = "active";

/// Elements the premium form controller renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchTarget {
    PremiumForm,
    CalculateButton,
    InsuranceBranch,
}

impl ViewTarget for BranchTarget {
    const ALL: &'static [Self] = &[
        BranchTarget::PremiumForm,
        BranchTarget::CalculateButton,
        BranchTarget::InsuranceBranch,
    ];

    fn element_id(self) -> &'static str {
        match self {
            BranchTarget::PremiumForm => "premiumForm",
            BranchTarget::CalculateButton => "calculateBtn",
            BranchTarget::InsuranceBranch => "insuranceBranch",
        }
    }

    fn required(self) -> bool {
        matches!(self, BranchTarget::PremiumForm)
    }
}

/// Fields every branch declares; disabled wherever they appear, even
/// outside a branch section.
fn coverage_fields() -> Selector {
    Selector::tag("select")
        .and(Selector::name("coverageType"))
        .or(Selector::tag("input").and(Selector::name("coverageAmount")))
        .or(Selector::tag("input").and(Selector::name("term")))
}

fn section_fields() -> Selector {
    Selector::tag("select").or(Selector::tag("input"))
}

/// Controller owning the premium form document.
#[derive(Debug, Clone)]
pub struct BranchSelector {
    document: Document,
    bindings: Bindings<BranchTarget>,
    active: Branch,
    submitting: bool,
}

impl BranchSelector {
    /// Bind the document and select the initial branch (`vie`)
    pub fn init(document: Document) -> Result<Self, BindingError> {
        let bindings = Bindings::bind(&document)?;
        let mut selector = Self {
            document,
            bindings,
            active: Branch::Vie,
            submitting: false,
        };
        tracing::info!("Premium form controller initialised");
        selector.select_branch(Branch::Vie);
        Ok(selector)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn active(&self) -> Branch {
        self.active
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Show the section of `branch` and enable only its fields
    pub fn select_branch(&mut self, branch: Branch) {
        tracing::debug!(branch = %branch, "Selecting insurance branch");
        let doc = &mut self.document;

        for section in doc.query_all(&Selector::class(BRANCH_SECTION_CLASS)) {
            doc.hide(section);
        }
        let active_section = doc.get_by_id(&branch.section_id());
        if let Some(section) = active_section {
            doc.show(section);
        }

        if let Some(field) = self.bindings.get(BranchTarget::InsuranceBranch) {
            doc.set_value(field, branch.as_str());
        }

        doc.update_all(&Selector::class(BRANCH_OPTION_CLASS), |el| {
            el.remove_class(ACTIVE_CLASS)
        });
        doc.update_all(
            &Selector::class(BRANCH_OPTION_CLASS).and(Selector::data_eq("branch", branch.as_str())),
            |el| el.add_class(ACTIVE_CLASS),
        );

        let branch_fields =
            coverage_fields().or(section_fields().inside(Selector::class(BRANCH_SECTION_CLASS)));
        doc.update_all(&branch_fields, |el| el.set_disabled(true));
        if let Some(section) = active_section {
            for field in doc.query_within(section, &section_fields()) {
                doc.set_disabled(field, false);
            }
        }

        self.active = branch;
    }

    /// Click on a `.branch-option`: select the branch named by `data-branch`
    pub fn handle_option_click(&mut self, option: NodeKey) {
        let Some(value) = self.document.get(option).data("branch") else {
            tracing::warn!("Branch option without data-branch attribute");
            return;
        };
        match value.parse::<Branch>() {
            Ok(branch) => self.select_branch(branch),
            Err(err) => tracing::warn!(error = %err, "Ignoring branch option click"),
        }
    }

    /// Form submission: lock the submit button and disable every branch field
    pub fn handle_submit(&mut self) {
        tracing::info!(branch = %self.active, "Submitting premium form");
        let doc = &mut self.document;

        if let Some(button) = self.bindings.get(BranchTarget::CalculateButton) {
            doc.set_inner_html(button, SUBMITTING_LABEL);
            doc.set_disabled(button, true);
        }

        doc.update_all(
            &section_fields().inside(Selector::class(BRANCH_SECTION_CLASS)),
            |el| el.set_disabled(true),
        );
        self.submitting = true;
    }

    /// JSON body for the premium endpoint built from the fields that are
    /// currently enabled on the form.
    pub fn premium_payload(&self) -> PremiumPayload {
        let fields = self
            .bindings
            .get(BranchTarget::PremiumForm)
            .map(|form| self.document.form_data(form))
            .unwrap_or_default();
        PremiumPayload::from_fields(self.active, fields)
    }
}
