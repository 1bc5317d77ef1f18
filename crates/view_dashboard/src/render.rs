//! HTML fragments rendered from API data.

use serde_json::Value;
use view_dom::{escape_html, Node};

use crate::format::{format_currency, truncate_text, LossRatio};
use crate::models::{Portfolio, Scenario, SimulationResult, SimulationSummary};

/// Maximum displayed length of a portfolio name in the recent list
pub const RECENT_NAME_MAX_LEN: usize = 30;

const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Results panel shown in `#simulation-results`
pub fn render_results_panel(result: &SimulationResult) -> String {
    let metrics = &result.results;
    let ratio = LossRatio::compute(metrics.max_loss, metrics.portfolio_value);

    format!(
        r#"<div class="bg-white rounded-lg shadow-lg p-6 animate-fade-in">
    <h3 class="text-xl font-bold mb-4">Résultats de la Simulation</h3>
    <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
        <div class="space-y-4">
            <div class="metric-card">
                <h4 class="font-semibold">Valeur du Portefeuille</h4>
                <p class="text-2xl text-green-600">{portfolio_value}</p>
            </div>
            <div class="metric-card">
                <h4 class="font-semibold">Perte Maximale</h4>
                <p class="text-2xl text-red-600">{max_loss}</p>
            </div>
        </div>
        <div class="space-y-4">
            <div class="metric-card">
                <h4 class="font-semibold">Scénario le Plus Sévère</h4>
                <p class="text-lg">{scenario}</p>
            </div>
            <div class="metric-card">
                <h4 class="font-semibold">Ratio de Perte</h4>
                <p class="text-2xl {ratio_class}">{ratio}</p>
            </div>
        </div>
    </div>
</div>"#,
        portfolio_value = format_currency(metrics.portfolio_value),
        max_loss = format_currency(metrics.max_loss),
        scenario = escape_html(&metrics.most_severe_scenario),
        ratio_class = ratio.css_class(),
        ratio = ratio,
    )
}

/// `<option>` elements of `#portfolio-select`
pub fn portfolio_options(portfolios: &[Portfolio]) -> Vec<Node> {
    portfolios
        .iter()
        .map(|portfolio| {
            Node::new("option")
                .attr("value", portfolio.id.to_string())
                .text(format!(
                    "{} ({})",
                    portfolio.name,
                    format_currency(portfolio.total_value)
                ))
        })
        .collect()
}

/// Scenario checkboxes of `#scenarios-container`, default scenarios pre-checked
pub fn scenario_checkboxes(scenarios: &[Scenario]) -> Vec<Node> {
    scenarios
        .iter()
        .map(|scenario| {
            Node::new("label")
                .class("flex items-center space-x-2 p-2 border rounded")
                .child(
                    Node::new("input")
                        .attr("type", "checkbox")
                        .name("scenarios")
                        .value(scenario.id.to_string())
                        .checked(scenario.is_default),
                )
                .child(Node::new("span").text(scenario.name.clone()))
                .child(
                    Node::new("span")
                        .class("text-sm text-gray-500")
                        .text(scenario.description.clone()),
                )
        })
        .collect()
}

fn action_button(action: &str, simulation: &SimulationSummary, label: &str) -> Node {
    Node::new("button")
        .class("text-blue-600 hover:underline")
        .data("action", action)
        .data("simulation-id", simulation.id.to_string())
        .text(label)
}

/// Rows of `#recent-simulations`, each with view and download actions
pub fn recent_simulation_rows(simulations: &[SimulationSummary]) -> Vec<Node> {
    simulations
        .iter()
        .map(|simulation| {
            let mut row = Node::new("div")
                .class("recent-simulation flex justify-between items-center p-3 border-b")
                .data("simulation-id", simulation.id.to_string())
                .child(
                    Node::new("div")
                        .child(
                            Node::new("p")
                                .class("font-medium")
                                .attr("title", simulation.portfolio_name.clone())
                                .text(truncate_text(&simulation.portfolio_name, RECENT_NAME_MAX_LEN)),
                        )
                        .child(
                            Node::new("p")
                                .class("text-sm text-gray-500")
                                .text(format!(
                                    "{} · {}",
                                    simulation.simulation_type,
                                    simulation.created_at.format(DATE_FORMAT)
                                )),
                        ),
                );
            if let Some(status) = &simulation.status {
                row = row.child(Node::new("span").class("status").text(status.clone()));
            }
            row.child(
                Node::new("div")
                    .class("space-x-2")
                    .child(action_button("view", simulation, "Voir"))
                    .child(action_button("download", simulation, "Télécharger")),
            )
        })
        .collect()
}

/// Content of `#report-modal`: title, close button and the pretty-printed report
pub fn render_report_modal(report: &Value) -> Node {
    let body = serde_json::to_string_pretty(report).unwrap_or_else(|_| report.to_string());
    Node::new("div")
        .class("bg-white rounded-lg shadow-lg p-6 max-w-3xl mx-auto")
        .child(
            Node::new("div")
                .class("flex justify-between items-center mb-4")
                .child(
                    Node::new("h3")
                        .class("text-xl font-bold")
                        .text("Rapport de Simulation"),
                )
                .child(
                    Node::new("button")
                        .class("text-gray-500")
                        .data("action", "close-report")
                        .text("×"),
                ),
        )
        .child(Node::new("pre").class("text-sm overflow-auto").text(body))
}
