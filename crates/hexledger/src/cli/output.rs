use colored::{Color, Colorize};
use std::fmt;

use hexledger_config::Config;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

/// Turns colour on or off for the whole process.
///
/// `NO_COLOR` always wins; otherwise the config flag decides. `colored`
/// already drops styling when stdout is not a terminal.
pub fn apply_config(config: &Config) {
    let disabled = std::env::var_os("NO_COLOR").is_some() || !config.ui_color_enabled;
    if disabled {
        colored::control::set_override(false);
    } else {
        colored::control::unset_override();
    }
}

fn label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[+]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Hint => ("HINT", ">"),
        MessageKind::Section => ("", ""),
    }
}

pub(crate) fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    if kind == MessageKind::Section {
        return format!("=== {} ===", text.trim()).bold().to_string();
    }
    let (name, icon) = label(kind);
    let line = format!("{name}: {icon} {text}");
    match kind {
        MessageKind::Success => line.bright_green().to_string(),
        MessageKind::Warning => line.bright_yellow().to_string(),
        MessageKind::Error => line.bright_red().to_string(),
        MessageKind::Hint => line.bright_cyan().to_string(),
        _ => line,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Plain indented line, used for tables and detail rows.
pub fn line(text: impl fmt::Display) {
    println!("  {}", text);
}

/// Label/value rows with the labels padded to a common width.
pub fn two_column<L: AsRef<str>, V: fmt::Display>(rows: &[(L, V)]) {
    let width = rows
        .iter()
        .map(|(label, _)| label.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in rows {
        println!("  {:<width$}  {}", label.as_ref(), value, width = width);
    }
}

/// Paints `text` with a `#rrggbb` colour; anything unparsable is left plain.
pub fn paint_hex(text: &str, hex: &str) -> String {
    match parse_hex_color(hex) {
        Some((r, g, b)) => text.color(Color::TrueColor { r, g, b }).to_string(),
        None => text.to_string(),
    }
}

fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_styles_carry_labels() {
        colored::control::set_override(false);
        assert_eq!(apply_style(MessageKind::Warning, "careful"), "WARNING: [!] careful");
        assert_eq!(apply_style(MessageKind::Section, " Summary "), "=== Summary ===");
        assert_eq!(paint_hex("Asset", "#3b82f6"), "Asset");
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(parse_hex_color("#8884d8"), Some((0x88, 0x84, 0xd8)));
        assert_eq!(parse_hex_color("8884d8"), None);
        assert_eq!(parse_hex_color("#zz84d8"), None);
    }
}
