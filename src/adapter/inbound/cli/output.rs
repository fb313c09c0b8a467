//! CLI output formatting.
//!
//! Human-readable output uses colored symbols and aligned fields. With
//! `--json` every helper emits one `{"type", "payload"}` line instead, and
//! commands that produce a document (the report, a tick lookup) print it
//! whole through [`json_output`]. Errors always go to stderr.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use parking_lot::RwLock;
use serde_json::{json, Value};

/// Output mode selected by the global `--json` and `--quiet` flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    /// Suppress everything but warnings, errors and documents.
    pub quiet: bool,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        Self { json, quiet }
    }
}

static MODE: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn mode() -> OutputConfig {
    *MODE.get_or_init(RwLock::default).read()
}

/// Apply output settings from global CLI flags.
pub fn configure(config: OutputConfig) {
    *MODE.get_or_init(RwLock::default).write() = config;
}

#[must_use]
pub fn is_json() -> bool {
    mode().json
}

#[must_use]
pub fn is_quiet() -> bool {
    mode().quiet
}

/// How a human-readable line is treated under `--quiet`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Importance {
    Regular,
    Always,
}

/// Print one line in the active mode. `human` is only rendered when needed.
fn emit(kind: &str, payload: Value, importance: Importance, human: impl FnOnce() -> String) {
    let config = mode();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if importance == Importance::Always || !config.quiet {
        println!("{}", human());
    }
}

/// Print the application name and version.
pub fn header(version: &str) {
    emit(
        "header",
        json!({ "app": "relister", "version": version }),
        Importance::Regular,
        || format!("{} {}", "relister".bold(), version.dimmed()),
    );
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        json!({ "label": label, "value": value }),
        Importance::Regular,
        || format!("  {:<18} {}", label.dimmed(), value),
    );
}

pub fn success(message: &str) {
    emit("success", json!({ "message": message }), Importance::Regular, || {
        format!("  {} {}", "✓".green(), message)
    });
}

/// Print a warning. Shown even with `--quiet`.
pub fn warning(message: &str) {
    emit("warning", json!({ "message": message }), Importance::Always, || {
        format!("  {} {}", "⚠".yellow(), message)
    });
}

/// Print an error line to stderr.
pub fn error(message: &str) {
    if mode().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {}", "×".red(), message);
    }
}

/// Print a section title preceded by a blank line.
pub fn section(title: &str) {
    emit("section", json!({ "title": title }), Importance::Regular, || {
        format!("\n{}", title.bold())
    });
}

/// Print a dimmed note.
pub fn note(message: &str) {
    emit("note", json!({ "message": message }), Importance::Regular, || {
        format!("  {}", message.dimmed())
    });
}

/// Print pre-rendered multi-line content, such as a table, indented under
/// the current section.
pub fn lines(content: &str) {
    if is_quiet() && !is_json() {
        return;
    }
    for line in content.lines() {
        println!("  {line}");
    }
}

/// Emit a JSON document directly.
pub fn json_output(value: Value) {
    println!("{value}");
}
