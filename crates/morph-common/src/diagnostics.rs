//! The diagnostics sink shared by the parser and the resolution workers.
//!
//! [`Diagnostics`] is a cheap-to-clone handle over one shared buffer. Each
//! handle may carry an origin (usually a file path) that is stamped onto every
//! record it appends, so records written concurrently from several worker
//! threads keep their file association.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use parking_lot::Mutex;
use serde::Serialize;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// One `(message, location, severity)` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub span: Span,
    /// File (or other origin) the record was produced for.
    pub origin: Option<Arc<str>>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(origin) = &self.origin {
            write!(f, "{origin}: ")?;
        }
        write!(
            f,
            "{}: {} at {}..{}",
            self.severity, self.message, self.span.start, self.span.end
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Arc<Mutex<Vec<Diagnostic>>>,
    origin: Option<Arc<str>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle over the same buffer whose records are tagged with `origin`.
    pub fn with_origin(&self, origin: impl Into<Arc<str>>) -> Self {
        Self {
            records: Arc::clone(&self.records),
            origin: Some(origin.into()),
        }
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn report(&self, severity: Severity, message: impl Into<String>, span: Span) {
        self.records.lock().push(Diagnostic {
            message: message.into(),
            severity,
            span,
            origin: self.origin.clone(),
        });
    }

    pub fn error(&self, message: impl Into<String>, span: Span) {
        self.report(Severity::Error, message, span);
    }

    pub fn warning(&self, message: impl Into<String>, span: Span) {
        self.report(Severity::Warning, message, span);
    }

    pub fn note(&self, message: impl Into<String>, span: Span) {
        self.report(Severity::Note, message, span);
    }

    /// Copy of every record appended so far, in append order.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// Records produced for `origin` only.
    pub fn for_origin(&self, origin: &str) -> Vec<Diagnostic> {
        self.records
            .lock()
            .iter()
            .filter(|d| d.origin.as_deref() == Some(origin))
            .cloned()
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

// ── Rendering ──────────────────────────────────────────────────────────

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Note => ReportKind::Advice,
    }
}

/// Render a diagnostic against its source text using ariadne.
///
/// Output is colorless so it can be compared in tests.
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str) -> std::io::Result<String> {
    let config = Config::default().with_color(false);
    let source_len = source.len();

    // ariadne needs a non-empty span that lies inside the source.
    let clamp = |r: Range<usize>| -> Range<usize> {
        let s = r.start.min(source_len);
        let e = r.end.min(source_len).max(s);
        if s == e {
            s..e.saturating_add(1).min(source_len)
        } else {
            s..e
        }
    };
    let range = clamp(diagnostic.span.to_range());

    let color = match diagnostic.severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Note => Color::Blue,
    };

    let report = Report::build(report_kind(diagnostic.severity), range.clone())
        .with_message(&diagnostic.message)
        .with_config(config)
        .with_label(
            Label::new(range)
                .with_message(&diagnostic.message)
                .with_color(color),
        )
        .finish();

    let mut buf = Vec::new();
    report.write(Source::from(source), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_one_buffer() {
        let diags = Diagnostics::new();
        let a = diags.with_origin("A.h");
        let b = diags.with_origin("B.h");
        a.error("first", Span::new(0, 1));
        b.warning("second", Span::new(2, 3));
        diags.note("third", Span::at(4));

        assert_eq!(diags.len(), 3);
        assert_eq!(diags.error_count(), 1);
        let all = diags.snapshot();
        assert_eq!(all[0].origin.as_deref(), Some("A.h"));
        assert_eq!(all[1].origin.as_deref(), Some("B.h"));
        assert_eq!(all[2].origin, None);
        assert_eq!(diags.for_origin("B.h")[0].message, "second");
    }

    #[test]
    fn concurrent_appends_keep_their_origin() {
        let diags = Diagnostics::new();
        std::thread::scope(|s| {
            for file in ["A.h", "B.h", "C.h", "D.h"] {
                let handle = diags.with_origin(file);
                s.spawn(move || {
                    for i in 0..50 {
                        handle.error(format!("{file} #{i}"), Span::new(i, i + 1));
                    }
                });
            }
        });

        assert_eq!(diags.len(), 200);
        for d in diags.snapshot() {
            let origin = d.origin.as_deref().unwrap();
            assert!(d.message.starts_with(origin));
        }
    }

    #[test]
    fn display_includes_origin_and_location() {
        let diags = Diagnostics::new().with_origin("A.h");
        diags.error("Expected type name", Span::new(10, 12));
        let d = &diags.snapshot()[0];
        assert_eq!(d.to_string(), "A.h: error: Expected type name at 10..12");
    }

    #[test]
    fn renders_message_with_source_context() {
        let source = "@interface A\n@property int ;\n@end";
        let diagnostic = Diagnostic {
            message: "Expected identifier for property name".to_string(),
            severity: Severity::Error,
            span: Span::at(27),
            origin: None,
        };
        let rendered = render_diagnostic(&diagnostic, source).unwrap();
        assert!(rendered.contains("Error"));
        assert!(rendered.contains("Expected identifier for property name"));
        assert!(rendered.contains("@property int ;"));
    }
}
