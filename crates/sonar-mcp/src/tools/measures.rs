//! Component measures lookup.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::measures::{
    AnalysisPeriod, ComponentMeasuresResponse, Measure, MeasureMetric, MeasuredComponent,
};
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "get_component_measures";

pub struct GetComponentMeasuresTool {
    server_api: Arc<ServerApi>,
}

impl GetComponentMeasuresTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for GetComponentMeasuresTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOOL_NAME,
            "Get measures for a component (project, directory, file).",
        )
        .with_string_property("component", "The component key to get measures for")
        .with_string_property("branch", "The branch to analyze for measures")
        .with_array_property(
            "metricKeys",
            "string",
            "The metric keys to retrieve (e.g. nloc, complexity, violations, coverage)",
        )
        .with_string_property(
            "pullRequest",
            "The pull request identifier to analyze for measures",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let component = args.get_optional_string("component");
        let branch = args.get_optional_string("branch");
        let metric_keys = args.get_optional_string_list("metricKeys");
        let pull_request = args.get_optional_string("pullRequest");
        let response = self
            .server_api
            .measures_api()
            .get_component_measures(
                component.as_deref(),
                branch.as_deref(),
                metric_keys.as_deref(),
                pull_request.as_deref(),
            )
            .await?;
        Ok(ToolResult::success(render(&response)))
    }
}

fn render(response: &ComponentMeasuresResponse) -> String {
    let Some(component) = &response.component else {
        return "No component found.".to_string();
    };
    let mut out = String::new();
    append_component(&mut out, component);
    append_measures(&mut out, component, &response.metrics);
    append_metrics(&mut out, &response.metrics);
    append_periods(&mut out, &response.periods);
    out.trim().to_string()
}

fn append_component(out: &mut String, component: &MeasuredComponent) {
    let _ = writeln!(out, "Component: {}", component.name);
    let _ = writeln!(out, "Key: {}", component.key);
    let _ = writeln!(
        out,
        "Qualifier: {}",
        component.qualifier.as_deref().unwrap_or("")
    );
    if let Some(language) = &component.language {
        let _ = writeln!(out, "Language: {language}");
    }
    if let Some(path) = &component.path {
        let _ = writeln!(out, "Path: {path}");
    }
    out.push('\n');
}

fn append_measures(out: &mut String, component: &MeasuredComponent, metrics: &[MeasureMetric]) {
    if component.measures.is_empty() {
        out.push_str("No measures found for this component.");
        return;
    }
    out.push_str("Measures:\n");
    for measure in &component.measures {
        append_measure(out, measure, metrics);
    }
}

fn append_measure(out: &mut String, measure: &Measure, metrics: &[MeasureMetric]) {
    match metrics.iter().find(|m| m.key == measure.metric) {
        Some(metric) => {
            let _ = write!(out, "  - {} ({}): ", metric.name, measure.metric);
            if let Some(value) = &measure.value {
                out.push_str(value);
            }
            append_measure_periods(out, measure);
            out.push('\n');
            if let Some(description) = &metric.description {
                let _ = writeln!(out, "    Description: {description}");
            }
        }
        None => {
            let _ = writeln!(
                out,
                "  - {}: {}",
                measure.metric,
                measure.value.as_deref().unwrap_or("")
            );
        }
    }
}

fn append_measure_periods(out: &mut String, measure: &Measure) {
    if measure.periods.is_empty() {
        return;
    }
    out.push_str(" | New: ");
    for period in &measure.periods {
        out.push_str(period.value.as_deref().unwrap_or(""));
        if !period.best_value {
            out.push_str(" (not best)");
        }
    }
}

fn append_metrics(out: &mut String, metrics: &[MeasureMetric]) {
    if metrics.is_empty() {
        return;
    }
    out.push_str("\nAvailable Metrics:\n");
    for metric in metrics {
        let _ = writeln!(out, "  - {} ({})", metric.name, metric.key);
        let _ = writeln!(
            out,
            "    Description: {}",
            metric.description.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "    Domain: {}", metric.domain.as_deref().unwrap_or(""));
        let _ = writeln!(
            out,
            "    Type: {}",
            metric.metric_type.as_deref().unwrap_or("")
        );
        let _ = writeln!(
            out,
            "    Higher values are better: {}",
            metric.higher_values_are_better
        );
        let _ = writeln!(out, "    Qualitative: {}", metric.qualitative);
        let _ = writeln!(out, "    Hidden: {}", metric.hidden);
        let _ = writeln!(out, "    Custom: {}", metric.custom);
        out.push('\n');
    }
}

fn append_periods(out: &mut String, periods: &[AnalysisPeriod]) {
    if periods.is_empty() {
        return;
    }
    out.push_str("Periods:\n");
    for period in periods {
        let _ = write!(
            out,
            "  - Period {}: {}",
            period.index.unwrap_or(0),
            period.mode.as_deref().unwrap_or("")
        );
        if let Some(date) = &period.date {
            let _ = write!(out, " ({date})");
        }
        if let Some(parameter) = &period.parameter {
            let _ = write!(out, " - {parameter}");
        }
        out.push('\n');
    }
}
