//! Input Reconciliation Controller
//!
//! Owns the one `ValueSet` behind both editing surfaces. The form view writes
//! straight into it; the document view only reaches it through an explicit
//! apply, and while its text has unapplied edits nothing can be submitted.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::document::{parse_document, render_document};
use super::validation::{validate, FieldError, ValidationResult};
use super::{FieldValue, ValueSet};
use crate::error::{DocumentError, InputError, SubmitError};
use crate::features::FeatureRegistry;

/// Numeric-only submission body, keyed by feature id.
pub type Features = BTreeMap<String, f64>;

/// Which editing surface is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Form,
    Document,
}

/// Submission readiness as seen from the editing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Form editing, or a document view that mirrors the value set
    Editing,
    /// Document view applied successfully and untouched since
    Clean,
    /// Document text holds edits not yet applied
    Dirty,
}

#[derive(Debug, Default)]
struct DocumentView {
    text: String,
    dirty: bool,
    applied: bool,
}

pub struct InputController {
    registry: Arc<FeatureRegistry>,
    values: ValueSet,
    validation: ValidationResult,
    mode: InputMode,
    document: DocumentView,
    is_submitting: bool,
}

impl InputController {
    pub fn new(registry: Arc<FeatureRegistry>) -> Self {
        Self {
            registry,
            values: ValueSet::new(),
            validation: ValidationResult::default(),
            mode: InputMode::Form,
            document: DocumentView::default(),
            is_submitting: false,
        }
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    pub fn values(&self) -> &ValueSet {
        &self.values
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn readiness(&self) -> Readiness {
        if self.document.dirty {
            Readiness::Dirty
        } else if self.mode == InputMode::Document && self.document.applied {
            Readiness::Clean
        } else {
            Readiness::Editing
        }
    }

    /// Error recorded for a field by the last validation pass, if still current.
    pub fn field_error(&self, id: &str) -> Option<&FieldError> {
        self.validation.error(id)
    }

    pub fn last_validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Write one field from the form view. Out-of-range values are accepted here.
    pub fn set_field_value(&mut self, id: &str, value: impl Into<FieldValue>) -> Result<(), InputError> {
        if !self.registry.contains(id) {
            return Err(InputError::UnknownField(id.to_string()));
        }

        let value = value.into();
        debug!("Field {} set to {}", id, value);
        self.values.set(id, value);
        self.validation.clear_field(id);

        if self.mode == InputMode::Document && !self.document.dirty {
            self.document.text = render_document(&self.values);
        }
        Ok(())
    }

    /// Parse `raw` and, on success, replace the whole value set with it.
    ///
    /// On failure the value set is untouched and `raw` stays in the document
    /// view as unapplied text.
    pub fn load_from_document(&mut self, raw: &str) -> Result<(), InputError> {
        self.mode = InputMode::Document;
        self.document.text = raw.to_string();

        match parse_document(raw) {
            Ok(values) => {
                let unknown: Vec<&str> = values
                    .iter()
                    .map(|(id, _)| id)
                    .filter(|id| !self.registry.contains(id))
                    .collect();
                if !unknown.is_empty() {
                    debug!("Document carries ids outside the registry: {}", unknown.join(", "));
                }

                info!("Applied document with {} field(s)", values.len());
                self.values = values;
                self.validation = ValidationResult::default();
                self.document.dirty = false;
                self.document.applied = true;
                Ok(())
            }
            Err(e) => {
                self.document.dirty = true;
                Err(e.into())
            }
        }
    }

    /// Apply whatever text the document view currently holds.
    pub fn apply_document(&mut self) -> Result<(), InputError> {
        let text = std::mem::take(&mut self.document.text);
        self.load_from_document(&text)
    }

    /// Replace the document text without applying it.
    pub fn edit_document(&mut self, raw: impl Into<String>) {
        self.mode = InputMode::Document;
        self.document.text = raw.into();
        self.document.dirty = true;
    }

    pub fn document_text(&self) -> &str {
        &self.document.text
    }

    /// The error the current document text would produce if applied now.
    pub fn document_diagnostic(&self) -> Option<DocumentError> {
        parse_document(&self.document.text).err()
    }

    pub fn export_to_document(&self) -> String {
        render_document(&self.values)
    }

    /// Enter the document view, re-deriving its text from the value set.
    pub fn switch_to_document(&mut self) {
        self.mode = InputMode::Document;
        self.document = DocumentView {
            text: render_document(&self.values),
            dirty: false,
            applied: false,
        };
    }

    /// Leave the document view. Returns true if unapplied text was discarded.
    pub fn switch_to_form(&mut self) -> bool {
        let discarded = self.document.dirty;
        if discarded {
            warn!("Discarding unapplied document edits");
        }
        self.mode = InputMode::Form;
        self.document = DocumentView::default();
        discarded
    }

    /// Recompute per-field errors. Invalidity is reported, never raised.
    pub fn validate(&mut self) -> ValidationResult {
        self.validation = validate(&self.registry, &self.values);
        self.validation.clone()
    }

    /// Numeric payload of every set registry field.
    ///
    /// The current values are checked again, so a result computed before a
    /// later edit cannot let them through.
    pub fn build_submission(&self, validation: &ValidationResult) -> Result<Features, SubmitError> {
        if self.document.dirty {
            return Err(SubmitError::DocumentDirty);
        }
        if !validation.is_valid() {
            return Err(SubmitError::Invalid(validation.clone()));
        }
        let current = validate(&self.registry, &self.values);
        if !current.is_valid() {
            return Err(SubmitError::Invalid(current));
        }

        let mut features = Features::new();
        let mut dropped = Vec::new();
        for (id, value) in self.values.numbers() {
            if self.registry.contains(id) {
                features.insert(id.to_string(), value);
            } else {
                dropped.push(id);
            }
        }
        if !dropped.is_empty() {
            warn!("Dropping unknown feature(s) from submission: {}", dropped.join(", "));
        }
        Ok(features)
    }

    /// Gate and build a submission, marking it in flight on success.
    pub fn begin_submission(&mut self) -> Result<Features, SubmitError> {
        if self.is_submitting {
            return Err(SubmitError::Busy);
        }
        if self.document.dirty {
            return Err(SubmitError::DocumentDirty);
        }

        let validation = self.validate();
        let features = self.build_submission(&validation)?;
        self.is_submitting = true;
        Ok(features)
    }

    pub fn finish_submission(&mut self) {
        self.is_submitting = false;
    }
}
