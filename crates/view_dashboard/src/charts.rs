//! Chart.js-compatible chart configurations for the results dashboard.
//!
//! Each chart is a serialisable config; the dashboard writes it as JSON onto
//! the `data-chart` attribute of its canvas, where the page script hands it
//! to `new Chart(canvas, config)`.

use serde::Serialize;

use crate::models::SimulationResult;

/// Colour cycle of the allocation doughnut
pub const ALLOCATION_PALETTE: [&str; 8] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4", "#84cc16", "#f97316",
];

/// Bar colour of the risk and stress test charts
pub const RISK_COLOR: &str = "#ef4444";

/// Labels of the risk metrics bar chart, in dataset order
pub const RISK_LABELS: [&str; 4] = ["VaR 95%", "Expected Shortfall", "Stress Test Max", "SCR"];

// =============================================================================
// Chart.js structures
// =============================================================================

/// Chart type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Bar,
}

/// Either one colour for every bar or one colour per slice
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartColor {
    Single(String),
    Palette(Vec<String>),
}

/// Chart.js dataset
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartJsDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: ChartColor,
}

/// Chart.js data block
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartJsData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartJsDataset>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartJsTitleOptions {
    pub display: bool,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartJsLegendOptions {
    pub position: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartJsPlugins {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<ChartJsLegendOptions>,
    pub title: ChartJsTitleOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartJsOptions {
    pub responsive: bool,
    pub plugins: ChartJsPlugins,
}

/// Complete chart configuration
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartJsConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartJsData,
    pub options: ChartJsOptions,
}

impl ChartJsConfig {
    fn new(kind: ChartKind, dataset: ChartJsDataset, title: &str) -> Self {
        Self {
            kind,
            data: ChartJsData {
                labels: Vec::new(),
                datasets: vec![dataset],
            },
            options: ChartJsOptions {
                responsive: true,
                plugins: ChartJsPlugins {
                    legend: None,
                    title: ChartJsTitleOptions {
                        display: true,
                        text: title.to_string(),
                    },
                },
            },
        }
    }

    /// Replace labels and the values of the first dataset
    pub fn set_series(&mut self, labels: Vec<String>, values: Vec<f64>) {
        self.data.labels = labels;
        if let Some(dataset) = self.data.datasets.first_mut() {
            dataset.data = values;
        }
    }

    /// Values of the first dataset
    pub fn values(&self) -> &[f64] {
        self.data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        &self.options.plugins.title.text
    }

    /// JSON handed to Chart.js
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Dashboard charts
// =============================================================================

/// Portfolio allocation doughnut, legend at the bottom
pub fn allocation_chart() -> ChartJsConfig {
    let dataset = ChartJsDataset {
        label: None,
        data: Vec::new(),
        background_color: ChartColor::Palette(
            ALLOCATION_PALETTE.iter().map(|c| c.to_string()).collect(),
        ),
    };
    let mut chart = ChartJsConfig::new(ChartKind::Doughnut, dataset, "Répartition du Portefeuille");
    chart.options.plugins.legend = Some(ChartJsLegendOptions {
        position: "bottom".to_string(),
    });
    chart
}

/// Risk metrics bar chart with fixed labels
pub fn risk_chart() -> ChartJsConfig {
    let dataset = ChartJsDataset {
        label: Some("Exposition au Risque (€)".to_string()),
        data: Vec::new(),
        background_color: ChartColor::Single(RISK_COLOR.to_string()),
    };
    let mut chart = ChartJsConfig::new(ChartKind::Bar, dataset, "Métriques de Risque");
    chart.data.labels = RISK_LABELS.iter().map(|l| l.to_string()).collect();
    chart
}

/// Loss per stress scenario
pub fn stress_test_chart() -> ChartJsConfig {
    let dataset = ChartJsDataset {
        label: Some("Perte (€)".to_string()),
        data: Vec::new(),
        background_color: ChartColor::Single(RISK_COLOR.to_string()),
    };
    ChartJsConfig::new(ChartKind::Bar, dataset, "Résultats des Stress Tests")
}

/// The dashboard's three charts; a chart whose canvas is absent is `None`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardCharts {
    pub allocation: Option<ChartJsConfig>,
    pub risk: Option<ChartJsConfig>,
    pub stress_test: Option<ChartJsConfig>,
}

impl DashboardCharts {
    /// Feed the metrics of `result` into every existing chart
    pub fn update_with_results(&mut self, result: &SimulationResult) {
        let metrics = &result.results;

        if let Some(chart) = self.risk.as_mut() {
            let values = vec![
                metrics.var_95.unwrap_or(0.0),
                metrics.expected_shortfall.unwrap_or(0.0),
                metrics.stress_test_max.unwrap_or(metrics.max_loss),
                metrics.scr.unwrap_or(0.0),
            ];
            chart.set_series(RISK_LABELS.iter().map(|l| l.to_string()).collect(), values);
        }

        if let Some(chart) = self.allocation.as_mut() {
            let (labels, values) = metrics
                .allocation
                .iter()
                .map(|slice| (slice.label.clone(), slice.value))
                .unzip();
            chart.set_series(labels, values);
        }

        if let Some(chart) = self.stress_test.as_mut() {
            let (labels, values) = metrics
                .stress_tests
                .iter()
                .map(|outcome| (outcome.scenario.clone(), outcome.loss))
                .unzip();
            chart.set_series(labels, values);
        }
    }
}
