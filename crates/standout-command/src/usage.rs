//! Usage text.
//!
//! Usage is rendered for a node given the chain of commands leading to it,
//! root first. The chain provides the full command path and the options the
//! node inherits from its ancestors.
//!
//! ```text
//! Usage: github repos [OPTIONS] COMMAND
//!
//! Manage GitHub repositories
//!
//! Options:
//!   -verbose
//!         Enable verbose output
//!
//! Subcommands:
//!   list
//!         List repositories of a GitHub user
//! ```
//!
//! `COMMAND` is mandatory for a namespace (no handler) and shown as
//! `[COMMAND]` when the node also has a handler. Subcommands are listed in
//! name order.

use crate::command::Command;
use crate::options::{OptionEntry, OptionSet};

const HELP_INDENT: &str = "        ";

/// Renders usage for the last command of `trail`.
pub(crate) fn render(trail: &[&Command]) -> String {
    let Some(command) = trail.last() else {
        return String::new();
    };

    let path: Vec<&str> = trail.iter().map(|c| c.name()).collect();
    let hint = match (command.has_subcommands(), command.has_handler()) {
        (false, _) => "",
        (true, true) => " [COMMAND]",
        (true, false) => " COMMAND",
    };

    let mut out = format!("Usage: {} [OPTIONS]{}\n", path.join(" "), hint);

    if let Some(help) = command.help_text().filter(|help| !help.is_empty()) {
        out.push('\n');
        out.push_str(help);
        out.push('\n');
    }

    let options = visible_options(trail);
    if !options.is_empty() {
        out.push_str("\nOptions:\n");
        for entry in options.iter() {
            out.push_str(&option_line(entry));
        }
    }

    let children = command.subcommands();
    if !children.is_empty() {
        out.push_str("\nSubcommands:\n");
        for child in children {
            out.push_str("  ");
            out.push_str(child.name());
            out.push('\n');
            if let Some(help) = child.help_text().filter(|help| !help.is_empty()) {
                out.push_str(HELP_INDENT);
                out.push_str(help);
                out.push('\n');
            }
        }
    }

    out
}

/// Options visible at the end of `trail`: each command's own declarations
/// plus everything inherited from its ancestors.
pub(crate) fn visible_options(trail: &[&Command]) -> OptionSet {
    trail.iter().fold(OptionSet::new(), |inherited, command| {
        let mut own = command.options.clone();
        own.inherit(&inherited);
        own
    })
}

fn option_line(entry: &OptionEntry) -> String {
    let mut line = format!("  -{}", entry.name());
    if !entry.is_bool() {
        line.push(' ');
        line.push_str(entry.type_name());
    }
    line.push('\n');

    let mut help = entry.help().to_string();
    if !entry.has_zero_default() {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&format!("(default {})", entry.default_value()));
    }
    if !help.is_empty() {
        line.push_str(HELP_INDENT);
        line.push_str(&help);
        line.push('\n');
    }

    line
}
