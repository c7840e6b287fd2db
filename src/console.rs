//! Console commands and plain-text output for the dashboard.

use crate::dashboard::ResultPanel;
use crate::features::{Category, FeatureDescriptor, Section};
use crate::input::{InputController, InputMode, Readiness, ValidationResult};
use crate::prediction::{Prediction, ServiceHealth};
use anyhow::{Context, Result};
use std::path::Path;

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// List fields; `true` includes advanced ones
    Fields(bool),
    Set { id: String, value: f64 },
    Unset(String),
    /// Enter the JSON view
    Json,
    /// Replace the JSON text; the body follows on the next lines
    Edit,
    Apply,
    Load(String),
    Form,
    Export,
    Validate,
    Submit,
    Health,
    Dismiss,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("empty command".to_string());
        };
        let args: Vec<&str> = parts.collect();

        let command = match (head.to_lowercase().as_str(), args.as_slice()) {
            ("fields", []) => Command::Fields(false),
            ("fields", ["all"]) => Command::Fields(true),
            ("set", [id, value]) => {
                let value: f64 = value
                    .parse()
                    .map_err(|_| format!("'{}' is not a number", value))?;
                if !value.is_finite() {
                    return Err(format!("'{}' is not a finite number", args[1]));
                }
                Command::Set { id: id.to_string(), value }
            }
            ("unset", [id]) => Command::Unset(id.to_string()),
            ("json", []) => Command::Json,
            ("edit", []) => Command::Edit,
            ("apply", []) => Command::Apply,
            ("load", [path]) => Command::Load(path.to_string()),
            ("form", []) => Command::Form,
            ("export", []) => Command::Export,
            ("validate", []) => Command::Validate,
            ("submit" | "analyze", []) => Command::Submit,
            ("health", []) => Command::Health,
            ("dismiss", []) => Command::Dismiss,
            ("help" | "?", []) => Command::Help,
            ("quit" | "exit" | "q", []) => Command::Quit,
            (other, _) => return Err(format!("unrecognised command '{}' (try 'help')", other)),
        };
        Ok(command)
    }
}

pub const HELP: &str = "\
Commands:
  fields [all]        list core (or all) features with current values
  set <id> <value>    set a feature value
  unset <id>          clear a feature value
  json                switch to the JSON view
  edit                replace the JSON text (finish with a line holding '.')
  apply               apply the JSON text to the value set
  load <path>         apply a JSON file
  form                switch back to the form view
  export              print the value set as JSON
  validate            check required fields and ranges
  submit              send the candidate for classification
  health              ask whether the service has a model loaded
  dismiss             close the error banner
  quit";

/// Apply a JSON file to the controller. Read and parse failures are both
/// returned for display; neither touches the value set.
pub fn load_file(controller: &mut InputController, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    controller.load_from_document(&raw)?;
    Ok(())
}

fn render_field(feature: &FeatureDescriptor, controller: &InputController) -> String {
    let value = controller.values().get(&feature.id);
    let marker = if feature.required { "*" } else { " " };
    let unit = feature.unit.as_deref().map(|u| format!(" {}", u)).unwrap_or_default();
    let mut line = format!(
        "  {}{:<18} {:>12}{:<14} [{}]",
        marker,
        feature.id,
        value.to_string(),
        unit,
        feature.range_hint()
    );
    if let Some(error) = controller.field_error(&feature.id) {
        line.push_str(&format!("  <- {}", error));
    }
    line
}

/// Form view: fields grouped by section, core only unless `all`.
pub fn render_form(controller: &InputController, all: bool) -> String {
    let mut out = Vec::new();
    for section in [Section::Planet, Section::Stellar] {
        out.push(format!("{}", section));
        for feature in controller.registry().in_section(section) {
            if all || feature.category == Category::Core {
                out.push(render_field(feature, controller));
            }
        }
    }
    out.join("\n")
}

pub fn render_status(controller: &InputController) -> String {
    let mode = match controller.mode() {
        InputMode::Form => "form",
        InputMode::Document => "json",
    };
    let readiness = match controller.readiness() {
        Readiness::Editing => "editing",
        Readiness::Clean => "applied",
        Readiness::Dirty => "unapplied changes",
    };
    format!(
        "[{} view | {} | {} value(s) set]",
        mode,
        readiness,
        controller.values().set_count()
    )
}

pub fn render_validation(result: &ValidationResult) -> String {
    if result.is_valid() {
        return "All fields valid.".to_string();
    }
    let mut out = vec![format!("{} field(s) need attention:", result.error_count())];
    for (id, error) in result.errors() {
        out.push(format!("  {:<18} {}", id, error));
    }
    out.join("\n")
}

pub fn render_prediction(prediction: &Prediction) -> String {
    let mut out = vec![
        format!("Classification Result: {}", prediction.label),
        format!("Confidence: {:.1}%", prediction.confidence_percent()),
    ];
    for (label, p) in &prediction.probabilities {
        let filled = (p * 20.0).round() as usize;
        out.push(format!(
            "  {:<15} {:<20} {:>5.1}%",
            label,
            "#".repeat(filled.min(20)),
            p * 100.0
        ));
    }
    if let Some(radius) = prediction.radius {
        out.push(format!("Estimated radius: {:.2} Earth radii", radius));
    }
    let version = prediction
        .model_version
        .as_deref()
        .map(|v| format!(" ({})", v))
        .unwrap_or_default();
    out.push(format!("{}{}", prediction.timestamp.to_rfc3339(), version));
    out.join("\n")
}

pub fn render_panel(panel: &ResultPanel) -> String {
    let mut out = Vec::new();
    if let Some(error) = &panel.error {
        out.push(format!("! {}  (type 'dismiss' to close)", error));
    }
    match &panel.result {
        Some(prediction) => out.push(render_prediction(prediction)),
        None => out.push("Awaiting Analysis".to_string()),
    }
    out.join("\n")
}

pub fn render_health(health: &ServiceHealth) -> String {
    if health.model_loaded {
        "Prediction service online, model loaded.".to_string()
    } else {
        "Prediction service online, but no model is loaded.".to_string()
    }
}
