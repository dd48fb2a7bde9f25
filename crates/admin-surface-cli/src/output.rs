//! Terminal output for the three `--format` modes.
//!
//! Data goes to stdout; notices (ok, warnings, errors) go to stderr so JSON
//! and plain output stay machine-readable.

use std::fmt::Display;

use console::{Style, Term};
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

impl OutputMode {
    /// Map the `--format` value. Clap has already rejected anything else.
    pub fn from_flag(format: &str) -> Self {
        match format {
            "json" => Self::Json,
            "plain" => Self::Plain,
            _ => Self::Human,
        }
    }
}

/// The kind of stderr notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Done,
    Warning,
    Failure,
}

impl Tone {
    fn tag(self) -> &'static str {
        match self {
            Self::Done => "ok",
            Self::Warning => "warning",
            Self::Failure => "error",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Done => Style::new().green().bold(),
            Self::Warning => Style::new().yellow().bold(),
            Self::Failure => Style::new().red().bold(),
        }
    }
}

/// How the current invocation prints.
pub struct OutputContext {
    pub mode: OutputMode,
    pub verbose: u8,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    pub fn from_global(global: &GlobalOpts) -> Self {
        let term = std::env::var("TERM").ok();
        Self {
            mode: OutputMode::from_flag(&global.format),
            verbose: global.verbose,
            quiet: global.quiet,
            use_color: color_enabled(global.no_color, term.as_deref(), Term::stderr().is_term()),
        }
    }

    /// Tracing filter directive implied by `-v`/`-q`.
    pub fn log_directive(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// The stderr line for a notice, or `None` when this mode stays silent.
    ///
    /// `ok` lines only appear in human mode; warnings are dropped by `-q`.
    fn notice_line(&self, tone: Tone, msg: &str) -> Option<String> {
        if self.quiet && tone != Tone::Failure {
            return None;
        }
        match self.mode {
            OutputMode::Human => {
                let tag = match tone {
                    Tone::Done => tone.tag().to_string(),
                    _ => format!("{}:", tone.tag()),
                };
                if self.use_color {
                    Some(format!("{} {msg}", tone.style().apply_to(tag)))
                } else {
                    Some(format!("{tag} {msg}"))
                }
            }
            OutputMode::Json if tone == Tone::Done => None,
            OutputMode::Json => Some(serde_json::json!({ tone.tag(): msg }).to_string()),
            OutputMode::Plain if tone == Tone::Done => None,
            OutputMode::Plain => Some(tab_row([tone.tag(), msg])),
        }
    }

    fn notice(&self, tone: Tone, msg: &str) {
        if let Some(line) = self.notice_line(tone, msg) {
            eprintln!("{line}");
        }
    }

    pub fn success(&self, msg: &str) {
        self.notice(Tone::Done, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.notice(Tone::Warning, msg);
    }

    /// A human-only hint such as what to run next.
    pub fn hint(&self, msg: &str) {
        if !self.quiet && self.mode == OutputMode::Human {
            eprintln!("{}", self.dim(msg));
        }
    }

    /// Report a failed command. Parse failures with a location are rendered
    /// as a source diagnostic in human mode.
    pub fn print_error(&self, err: &CliError) {
        match self.mode {
            OutputMode::Human => match crate::diagnostic::parse_report(err) {
                Some(report) => eprintln!("{report:?}"),
                None => self.notice(Tone::Failure, &err.to_string()),
            },
            OutputMode::Json => eprintln!("{}", err.to_json()),
            OutputMode::Plain => self.notice(Tone::Failure, &err.to_string()),
        }
    }

    /// Pretty-print `value` as JSON on stdout.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize command output"),
        }
    }

    /// Finish a command that changed stored configuration: the payload in
    /// JSON mode, the summary line in human mode, nothing in plain mode.
    pub fn changed(&self, summary: &str, payload: serde_json::Value) {
        match self.mode {
            OutputMode::Json => self.emit(&payload),
            OutputMode::Human => self.success(summary),
            OutputMode::Plain => {}
        }
    }

    /// One tab-separated line of plain output.
    pub fn plain_row<I, D>(&self, fields: I)
    where
        I: IntoIterator<Item = D>,
        D: Display,
    {
        println!("{}", tab_row(fields));
    }

    /// Dim a secondary piece of human output.
    pub fn dim(&self, text: &str) -> String {
        if self.use_color {
            console::style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Color only on a real terminal that is not `dumb`, unless `--no-color`.
fn color_enabled(no_color: bool, term: Option<&str>, stderr_is_tty: bool) -> bool {
    !no_color && term != Some("dumb") && stderr_is_tty
}

fn tab_row<I, D>(fields: I) -> String
where
    I: IntoIterator<Item = D>,
    D: Display,
{
    fields
        .into_iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("\t")
}
