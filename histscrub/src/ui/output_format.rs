//! Styled message and summary printing for the CLI.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::ui::theme::{ThemeEntry, ThemeMap};

/// Writes `text` in the color of `entry`, or plain when color is off.
fn styled<W: Write + ?Sized>(
    writer: &mut W,
    text: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    match theme.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) if supports_color => write!(writer, "{}", text.color(color.to_ansi_color()))?,
        _ => write!(writer, "{}", text)?,
    }
    Ok(())
}

fn print_message<W: Write + ?Sized>(
    writer: &mut W,
    prefix: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    styled(writer, prefix, entry, theme, supports_color)?;
    writeln!(writer, " {}", message)?;
    Ok(())
}

pub fn print_info_message<W: Write + ?Sized>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    print_message(writer, "[info]", message, ThemeEntry::Info, theme, supports_color)
}

pub fn print_warn_message<W: Write + ?Sized>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    print_message(writer, "[warn]", message, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write + ?Sized>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    print_message(writer, "[error]", message, ThemeEntry::Error, theme, supports_color)
}

/// Prints per-term substitution counts.
pub fn print_summary<W: Write + ?Sized>(
    writer: &mut W,
    title: &str,
    occurrences: &BTreeMap<String, usize>,
    theme: &ThemeMap,
    supports_color: bool,
) -> Result<()> {
    styled(writer, &format!("--- {} ---", title), ThemeEntry::Header, theme, supports_color)?;
    writeln!(writer)?;

    if occurrences.is_empty() {
        styled(writer, "No watched data found.", ThemeEntry::Success, theme, supports_color)?;
        writeln!(writer)?;
        return Ok(());
    }

    for (term, count) in occurrences {
        styled(writer, term, ThemeEntry::SummaryTerm, theme, supports_color)?;
        write!(writer, ": ")?;
        styled(
            writer,
            &format!("{} occurrence(s)", count),
            ThemeEntry::SummaryOccurrences,
            theme,
            supports_color,
        )?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::default_theme_map;

    #[test]
    fn summary_without_color_is_plain_text() -> Result<()> {
        let mut counts = BTreeMap::new();
        counts.insert("password".to_string(), 2);
        counts.insert("token".to_string(), 1);

        let mut out = Vec::new();
        print_summary(&mut out, "Substitutions", &counts, &default_theme_map(), false)?;
        let text = String::from_utf8(out)?;
        assert_eq!(
            text,
            "--- Substitutions ---\npassword: 2 occurrence(s)\ntoken: 1 occurrence(s)\n"
        );
        Ok(())
    }

    #[test]
    fn empty_summary() -> Result<()> {
        let mut out = Vec::new();
        print_summary(&mut out, "Scan", &BTreeMap::new(), &default_theme_map(), false)?;
        assert!(String::from_utf8(out)?.contains("No watched data found."));
        Ok(())
    }

    #[test]
    fn colored_message_contains_escape_codes() -> Result<()> {
        let mut out = Vec::new();
        print_warn_message(&mut out, "careful", &default_theme_map(), true)?;
        let text = String::from_utf8(out)?;
        assert!(text.contains("\u{1b}["));
        assert!(text.ends_with(" careful\n"));
        Ok(())
    }

    #[test]
    fn plain_info_message_has_prefix() -> Result<()> {
        let mut out = Vec::new();
        print_info_message(&mut out, "done", &default_theme_map(), false)?;
        assert_eq!(String::from_utf8(out)?, "[info] done\n");
        Ok(())
    }
}
