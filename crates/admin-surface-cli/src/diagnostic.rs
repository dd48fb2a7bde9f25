use std::ops::Range;

use miette::{Diagnostic, NamedSource, SourceSpan};

use crate::error::CliError;

/// A config or snapshot parse failure with the offending location.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct FileDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    message: String,

    #[help]
    suggestion: Option<String>,
}

/// Build a miette report for a [`CliError::Parse`] that carries a location.
pub fn parse_report(err: &CliError) -> Option<miette::Report> {
    let CliError::Parse {
        path,
        message,
        source_text,
        span: Some(span),
    } = err
    else {
        return None;
    };

    let suggestion = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Some("See the [engine] and [cli] tables in the configuration reference.".to_string()),
        Some("json") => Some("The snapshot must be a JSON object with widgets, menu, users and protected_roles.".to_string()),
        _ => None,
    };

    let diagnostic = FileDiagnostic {
        src: NamedSource::new(path.display().to_string(), source_text.clone()),
        span: (span.start, span.end.saturating_sub(span.start)).into(),
        message: message.clone(),
        suggestion,
    };
    Some(miette::Report::new(diagnostic))
}

/// Byte range of a 1-based line/column position, as reported by serde_json.
///
/// The column counts bytes, so the range is widened to whole characters.
pub fn json_span(source: &str, line: usize, column: usize) -> Option<Range<usize>> {
    if line == 0 {
        return None;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    let mut start = (line_start + column.saturating_sub(1)).min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (start + 1).min(source.len());
    while !source.is_char_boundary(end) {
        end += 1;
    }
    Some(start..end)
}
