//! Section and results-tab view state.
//!
//! The dashboard shows exactly one section and, inside the results area,
//! exactly one tab. [`ViewState::transition`] is the only way to change
//! either; [`apply_view_state`] projects the state onto the document.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use view_dom::{Document, Selector};

const SECTION_CLASS: &str = "section";
const TAB_CONTENT_CLASS: &str = "tab-content";
const ACTIVE_CLASS: &str = "active";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnknownView {
    #[error("Unknown section: '{0}'")]
    Section(String),
    #[error("Unknown results tab: '{0}'")]
    Tab(String),
}

/// Top-level dashboard section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Overview,
    Portfolios,
    Scenarios,
    Simulation,
    Results,
    History,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Overview,
        Section::Portfolios,
        Section::Scenarios,
        Section::Simulation,
        Section::Results,
        Section::History,
    ];

    /// Id of the section element
    pub fn element_id(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Portfolios => "portfolios",
            Self::Scenarios => "scenarios",
            Self::Simulation => "simulation",
            Self::Results => "results",
            Self::History => "history",
        }
    }

    /// Navigation link target (`#overview`)
    pub fn href(&self) -> String {
        format!("#{}", self.element_id())
    }

    /// Section named by a navigation link
    pub fn from_href(href: &str) -> Result<Self, UnknownView> {
        href.trim().trim_start_matches('#').parse()
    }
}

impl FromStr for Section {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.element_id() == s)
            .ok_or_else(|| UnknownView::Section(s.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Tab of the results area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultsTab {
    #[default]
    Summary,
    Risk,
    StressTest,
    Allocation,
}

impl ResultsTab {
    pub const ALL: [ResultsTab; 4] = [
        ResultsTab::Summary,
        ResultsTab::Risk,
        ResultsTab::StressTest,
        ResultsTab::Allocation,
    ];

    /// Value of the tab button's `data-tab` attribute
    pub fn data_value(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Risk => "risk",
            Self::StressTest => "stress-test",
            Self::Allocation => "allocation",
        }
    }

    /// Id of the tab content element
    pub fn content_id(&self) -> String {
        format!("{}-tab", self.data_value())
    }
}

impl FromStr for ResultsTab {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.data_value() == s)
            .ok_or_else(|| UnknownView::Tab(s.to_string()))
    }
}

impl fmt::Display for ResultsTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_value())
    }
}

/// Navigation input of the view state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    Navigate(Section),
    SelectTab(ResultsTab),
}

/// Visible section and active results tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub section: Section,
    pub tab: ResultsTab,
}

impl ViewState {
    pub fn transition(self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::Navigate(section) => Self { section, ..self },
            ViewEvent::SelectTab(tab) => Self { tab, ..self },
        }
    }
}

/// Hide every `.section`, show `#{section}` and mark its navigation link
pub fn show_section(doc: &mut Document, section: Section) {
    doc.update_all(&Selector::class(SECTION_CLASS), |el| el.add_class(view_dom::HIDDEN_CLASS));
    if let Some(target) = doc.get_by_id(section.element_id()) {
        doc.show(target);
    }

    let href = section.href();
    let links = Selector::tag("a").and(Selector::has_attr("href")).inside(Selector::tag("nav"));
    doc.update_all(&links, |link| {
        if link.attr("href") == Some(href.as_str()) {
            link.add_class(ACTIVE_CLASS);
        } else {
            link.remove_class(ACTIVE_CLASS);
        }
    });
}

/// Hide every `.tab-content`, show `#{tab}-tab` and mark its `[data-tab]` button
pub fn switch_tab(doc: &mut Document, tab: ResultsTab) {
    doc.update_all(&Selector::class(TAB_CONTENT_CLASS), |el| {
        el.add_class(view_dom::HIDDEN_CLASS)
    });
    if let Some(target) = doc.get_by_id(&tab.content_id()) {
        doc.show(target);
    }

    doc.update_all(&Selector::has_data("tab"), |button| {
        if button.data("tab") == Some(tab.data_value()) {
            button.add_class(ACTIVE_CLASS);
        } else {
            button.remove_class(ACTIVE_CLASS);
        }
    });
}

pub fn apply_view_state(doc: &mut Document, state: ViewState) {
    show_section(doc, state.section);
    switch_tab(doc, state.tab);
}
