//! Help text generation.
//!
//! Help is a pure function of the tree and a path. The caller owns delivery
//! and splits the lines into messages with [`HelpText::chunks`].

use std::fmt;

use serde::Serialize;

use crate::command::tree::{CommandKind, CommandTree, Subcommand, SwitchSpec};
use crate::error::{Identifier, UserError};

/// Generated help, one entry per output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpText {
    pub lines: Vec<String>,
}

impl fmt::Display for HelpText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

impl HelpText {
    /// Group lines into messages of at most `budget` characters. Lines are
    /// kept whole when they fit; longer ones are split on char boundaries.
    pub fn chunks(&self, budget: usize) -> Vec<String> {
        let budget = budget.max(1);
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        // Counted apart from `current`, which stays empty after a blank line.
        let mut current_lines = 0;

        for line in &self.lines {
            for segment in split_chars(line, budget) {
                let segment_len = segment.chars().count();
                let needed = if current_lines == 0 {
                    segment_len
                } else {
                    current_len + 1 + segment_len
                };
                if needed > budget && current_lines > 0 {
                    chunks.push(std::mem::take(&mut current));
                    current_len = 0;
                    current_lines = 0;
                }
                if current_lines > 0 {
                    current.push('\n');
                    current_len += 1;
                }
                current.push_str(segment);
                current_len += segment_len;
                current_lines += 1;
            }
        }

        if current_lines > 0 {
            chunks.push(current);
        }
        chunks
    }
}

/// Split `line` into pieces of at most `budget` chars. An empty line yields
/// one empty segment.
fn split_chars(line: &str, budget: usize) -> Vec<&str> {
    if line.is_empty() {
        return vec![line];
    }
    let mut segments = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in line.char_indices() {
        if count == budget {
            segments.push(&line[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    segments.push(&line[start..]);
    segments
}

fn usage_arguments(node: &Subcommand) -> Vec<String> {
    let mut parts = Vec::new();
    match &node.kind {
        CommandKind::Leaf { arguments, .. } => {
            for argument in arguments {
                parts.push(if argument.required {
                    format!("<{}>", argument.name)
                } else {
                    format!("[{}]", argument.name)
                });
            }
        }
        CommandKind::Group { .. } => parts.push("<subcommand>".to_string()),
    }
    if !node.flags.is_empty() || !node.options.is_empty() {
        parts.push("[options...]".to_string());
    }
    parts
}

fn with_description(head: String, description: &str) -> String {
    if description.is_empty() {
        head
    } else {
        format!("{head} - {description}")
    }
}

fn switch_line(spec: &SwitchSpec, takes_value: bool) -> String {
    let value = if takes_value { "=<value>" } else { "" };
    let mut head = format!("  --{}{}", spec.name, value);
    if !spec.aliases.is_empty() {
        let aliases: Vec<String> = spec.aliases.iter().map(|a| format!("--{a}{value}")).collect();
        head.push_str(&format!(" (aliases: {})", aliases.join(", ")));
    }
    with_description(head, &spec.description)
}

/// Render help for the node at `path` (names or aliases below the root).
pub fn render_help<S: AsRef<str>>(
    tree: &CommandTree,
    path: &[S],
    case_insensitive: bool,
) -> Result<HelpText, UserError> {
    let nodes = tree.lookup(path, case_insensitive).ok_or_else(|| {
        let joined: Vec<&str> = path.iter().map(|s| s.as_ref()).collect();
        UserError::new(
            Identifier::SubcommandNotFound,
            format!("No command found at '{}'.", joined.join(" ")),
        )
    })?;
    let Some(node) = nodes.last().copied() else {
        return Ok(HelpText { lines: Vec::new() });
    };

    let mut usage: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
    usage.extend(usage_arguments(node));

    let mut lines = vec![format!("Usage: {}", usage.join(" "))];
    if !node.description.is_empty() {
        lines.push(String::new());
        lines.push(node.description.clone());
    }

    match &node.kind {
        CommandKind::Group { children } => {
            lines.push(String::new());
            lines.push("Subcommands:".to_string());
            for child in children {
                let mut head = format!("  {}", child.name);
                if !child.aliases.is_empty() {
                    head.push_str(&format!(" (aliases: {})", child.aliases.join(", ")));
                }
                if child.default {
                    head.push_str(" [default]");
                }
                lines.push(with_description(head, &child.description));
            }
        }
        CommandKind::Leaf { arguments, .. } => {
            if !arguments.is_empty() {
                lines.push(String::new());
                lines.push("Arguments:".to_string());
                for argument in arguments {
                    let head = if argument.required {
                        format!("  <{}>", argument.name)
                    } else {
                        format!("  [{}]", argument.name)
                    };
                    lines.push(with_description(head, &argument.description));
                }
            }
        }
    }

    let mut switches: Vec<(&SwitchSpec, bool)> = node
        .options
        .iter()
        .map(|o| (o, true))
        .chain(node.flags.iter().map(|f| (f, false)))
        .collect();
    if !switches.is_empty() {
        switches.sort_by(|a, b| a.0.name.cmp(&b.0.name));
        lines.push(String::new());
        lines.push("Options:".to_string());
        lines.extend(switches.into_iter().map(|(spec, takes_value)| switch_line(spec, takes_value)));
    }

    Ok(HelpText { lines })
}
