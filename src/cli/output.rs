//! Terminal output helpers.
//!
//! Status lines (success, warnings, hints) go to stderr; stdout carries
//! only data, so `vaulta get NAME | ...` and completion scripts stay clean.

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use console::{style, StyledObject};

use crate::vault::{Entry, EntrySummary};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

fn status(marker: StyledObject<&str>, msg: &str) {
    eprintln!("{marker} {msg}");
}

pub fn success(msg: &str) {
    status(style("\u{2713}").green().bold(), msg);
}

pub fn error(msg: &str) {
    status(style("\u{2717}").red().bold(), msg);
}

pub fn warning(msg: &str) {
    status(style("!").yellow().bold(), msg);
}

pub fn info(msg: &str) {
    status(style("\u{2139}").blue().bold(), msg);
}

/// Dimmed follow-up hint, e.g. the next command to run.
pub fn tip(msg: &str) {
    eprintln!("  {}", style(msg).dim());
}

/// Render entry summaries as a table on stdout.
///
/// Passwords are never part of a summary, so nothing secret is printed.
pub fn print_entries_table(entries: &[EntrySummary]) {
    if entries.is_empty() {
        info("The vault has no entries.");
        tip("Add one with `vaulta add <NAME>`.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Name", "Username", "Notes", "Updated"]);

    for entry in entries {
        table.add_row(vec![
            entry.name.clone(),
            entry.username.clone(),
            entry.notes.clone(),
            entry.updated_at.format(TIMESTAMP_FORMAT).to_string(),
        ]);
    }

    println!("{table}");
}

/// Print one entry on stdout, password included.
pub fn print_entry(entry: &Entry) {
    let rows = [
        ("name", entry.name.as_str()),
        ("username", entry.username.as_str()),
        ("password", entry.password.as_str()),
        ("notes", entry.notes.as_str()),
    ];

    for (label, value) in rows {
        if label == "notes" && value.is_empty() {
            continue;
        }
        println!("{} {value}", style(format!("{label:>8}:")).dim());
    }
}
