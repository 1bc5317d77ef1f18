//! Default dashboard page.

use view_dom::{Document, Node};

use crate::models::SimulationType;
use crate::view_state::{ResultsTab, Section};

fn nav_label(section: Section) -> &'static str {
    match section {
        Section::Overview => "Vue d'ensemble",
        Section::Portfolios => "Portefeuilles",
        Section::Scenarios => "Scénarios",
        Section::Simulation => "Simulation",
        Section::Results => "Résultats",
        Section::History => "Historique",
    }
}

fn tab_label(tab: ResultsTab) -> &'static str {
    match tab {
        ResultsTab::Summary => "Synthèse",
        ResultsTab::Risk => "Risques",
        ResultsTab::StressTest => "Stress Tests",
        ResultsTab::Allocation => "Allocation",
    }
}

fn labelled(label: &str, field: Node) -> Node {
    Node::new("div")
        .class("form-group")
        .child(Node::new("label").text(label))
        .child(field)
}

fn simulation_form() -> Node {
    let types = SimulationType::ALL.iter().map(|t| {
        Node::new("option")
            .attr("value", t.as_str())
            .text(t.label())
    });
    let methods = [
        ("historical", "Historique"),
        ("parametric", "Paramétrique"),
        ("monte-carlo", "Monte Carlo"),
    ]
    .into_iter()
    .map(|(value, label)| Node::new("option").attr("value", value).text(label));

    Node::new("form")
        .id("simulation-form")
        .child(labelled(
            "Type de simulation",
            Node::new("select")
                .id("simulation-type")
                .name("simulation-type")
                .value(SimulationType::MarketRisk.as_str())
                .children(types),
        ))
        .child(labelled(
            "Portefeuille",
            Node::new("select").id("portfolio-select").name("portfolio"),
        ))
        .child(labelled(
            "Niveau de confiance",
            Node::new("input")
                .id("confidence-level")
                .attr("type", "number")
                .attr("step", "0.01")
                .name("confidence_level")
                .value("0.95"),
        ))
        .child(labelled(
            "Horizon (jours)",
            Node::new("input")
                .id("time-horizon")
                .attr("type", "number")
                .name("time_horizon")
                .value("10"),
        ))
        .child(labelled(
            "Méthode VaR",
            Node::new("select")
                .id("var-method")
                .name("method")
                .value("historical")
                .children(methods),
        ))
        .child(Node::new("div").id("scenarios-container").class("grid grid-cols-2 gap-2"))
        .child(
            Node::new("button")
                .id("run-simulation-btn")
                .attr("type", "submit")
                .class("btn btn-primary")
                .text("Lancer la simulation"),
        )
}

fn tab_panel(tab: ResultsTab) -> Node {
    let content = match tab {
        ResultsTab::Summary => Node::new("div").id("simulation-results"),
        ResultsTab::Risk => Node::new("canvas").id("risk-chart"),
        ResultsTab::StressTest => Node::new("canvas").id("stress-test-chart"),
        ResultsTab::Allocation => Node::new("canvas").id("allocation-chart"),
    };
    Node::new("div")
        .id(tab.content_id())
        .class("tab-content hidden")
        .child(content)
}

fn section_node(section: Section) -> Node {
    let node = Node::new("section")
        .id(section.element_id())
        .class("section hidden")
        .child(Node::new("h2").text(nav_label(section)));

    match section {
        Section::Simulation => node.child(simulation_form()),
        Section::Results => node
            .child(Node::new("div").class("tabs").children(ResultsTab::ALL.iter().map(|tab| {
                Node::new("button")
                    .class("tab")
                    .data("tab", tab.data_value())
                    .text(tab_label(*tab))
            })))
            .children(ResultsTab::ALL.into_iter().map(tab_panel)),
        Section::History => node.child(Node::new("div").id("recent-simulations")),
        _ => node,
    }
}

/// Dashboard page with every element the controller binds to.
///
/// All sections, tabs, the report modal and the loading indicator start
/// hidden; [`crate::Dashboard::init`] reveals the overview.
pub fn dashboard_document() -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    doc.append(
        root,
        Node::new("nav").children(Section::ALL.iter().map(|s| {
            Node::new("a")
                .attr("href", s.href())
                .class("nav-link")
                .text(nav_label(*s))
        })),
    );
    doc.append(
        root,
        Node::new("main").children(Section::ALL.into_iter().map(section_node)),
    );
    doc.append(
        root,
        Node::new("div")
            .id("report-modal")
            .class("modal fixed inset-0 hidden"),
    );
    doc.append(
        root,
        Node::new("div")
            .id("loading")
            .class("loading-overlay hidden")
            .child(Node::new("i").class("fas fa-spinner fa-spin")),
    );
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DashboardTarget;
    use view_dom::{Bindings, Selector, ViewTarget};

    #[test]
    fn test_template_binds_every_target() {
        let doc = dashboard_document();
        let bindings = Bindings::<DashboardTarget>::bind(&doc).unwrap();
        assert!(bindings.missing().is_empty());
        for target in DashboardTarget::ALL {
            assert!(bindings.is_bound(*target), "{:?}", target);
        }
    }

    #[test]
    fn test_form_inside_simulation_section() {
        let doc = dashboard_document();
        let form = Selector::id("simulation-form").inside(Selector::id("simulation"));
        assert!(doc.query(&form).is_some());
    }
}
