//! Error rendering using ariadne
//!
//! Renders interpreter errors with a snippet of the submission, the error
//! code and help text.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<submission>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use safeparse::{Interpreter, render_error};
///
/// let source = "x = 1 + 2";
/// let mut interpreter = Interpreter::new();
/// if let Err(e) = interpreter.parse(source) {
///     render_error(&e, source);
/// }
/// ```
pub fn render_error(error: &Error, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let diagnostic = error.to_diagnostic();
    match &diagnostic.span {
        Some(span) if span.0.end <= source.len() => {
            render_diagnostic(&diagnostic, span.0.clone(), source, writer, use_color)
        }
        // Errors without a location (unreadable input) have nothing to point at.
        _ => {
            write!(writer, "{}", error)?;
            if let Some(code) = &diagnostic.code {
                write!(writer, " [{}]", code)?;
            }
            writeln!(writer)?;
            if let Some(help) = &diagnostic.help {
                writeln!(writer, "help: {}", help)?;
            }
            Ok(())
        }
    }
}

fn render_diagnostic(
    diag: &Diagnostic,
    range: std::ops::Range<usize>,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    let message = match diag.line {
        Some(line) => format!("l.{}: {}", line, diag.message),
        None => diag.message.clone(),
    };

    let mut report = Report::build(kind, (SOURCE_ID, range.clone()))
        .with_message(&message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    let color = colors.next();
    report = report.with_label(
        Label::new((SOURCE_ID, range))
            .with_message(&diag.message)
            .with_color(color),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}
