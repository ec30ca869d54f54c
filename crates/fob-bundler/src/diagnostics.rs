//! The Diagnostics Sink (§4.13): a bundling accumulates non-fatal diagnostics here instead
//! of aborting on them. `render()` turns the accumulated diagnostics into miette reports
//! regardless of whether the bundling as a whole ultimately succeeded or failed.

use std::path::PathBuf;

use miette::{Diagnostic as MietteDiagnostic, Severity};
use thiserror::Error;

use crate::compile::CompilerDiagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    pub file: Option<PathBuf>,
}

/// Accumulates diagnostics in the order they were raised.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Warning,
            message: message.into(),
            file: None,
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            level: DiagnosticLevel::Error,
            message: message.into(),
            file: None,
        });
    }

    /// Forward diagnostics emitted by the typed-source compiler.
    pub fn extend_compiler(&mut self, diags: Vec<CompilerDiagnostic>) {
        for d in diags {
            self.diagnostics.push(Diagnostic {
                level: DiagnosticLevel::Error,
                message: d.message,
                file: d.file,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }

    /// Render every accumulated diagnostic as a miette-reportable error, preserving
    /// accumulation order.
    pub fn render(&self) -> Vec<RenderedDiagnostic> {
        self.diagnostics.iter().map(RenderedDiagnostic::from).collect()
    }
}

/// A single diagnostic wrapped for display through miette's report handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RenderedDiagnostic {
    pub message: String,
    pub level: DiagnosticLevel,
    pub file: Option<PathBuf>,
}

impl From<&Diagnostic> for RenderedDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: d.message.clone(),
            level: d.level,
            file: d.file.clone(),
        }
    }
}

impl MietteDiagnostic for RenderedDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(match self.level {
            DiagnosticLevel::Warning => Severity::Warning,
            DiagnosticLevel::Error => Severity::Error,
        })
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        self.file
            .as_ref()
            .map(|f| Box::new(format!("in {}", f.display())) as Box<dyn std::fmt::Display>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_in_order() {
        let mut sink = DiagnosticSink::new();
        sink.warn("first");
        sink.error("second");
        let messages: Vec<&str> = sink.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let mut sink = DiagnosticSink::new();
        sink.warn("just a warning");
        assert!(!sink.has_errors());
        sink.error("now fatal");
        assert!(sink.has_errors());
    }

    #[test]
    fn render_preserves_accumulation_order() {
        let mut sink = DiagnosticSink::new();
        sink.warn("a");
        sink.error("b");
        let rendered = sink.render();
        assert_eq!(rendered[0].to_string(), "a");
        assert_eq!(rendered[1].to_string(), "b");
    }
}
