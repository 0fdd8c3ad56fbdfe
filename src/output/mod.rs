//! Output formatters for analysis results.
//!
//! Analyses expose their results as [`Table`]s of ordered rows; JSON output
//! serializes the result structure directly instead.

use std::io::Write;

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Output format enum.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Markdown,
    #[default]
    Text,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown format: {s}. Use 'text', 'json', or 'md'")),
        }
    }
}

/// A titled table of pre-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<String>,
}

impl Table {
    pub fn new(title: impl Into<String>, headers: Vec<&'static str>) -> Self {
        Self {
            title: title.into(),
            headers,
            rows: Vec::new(),
            footer: None,
        }
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rows
            .push(cells.into_iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.rows
            .push(cells.into_iter().map(|c| c.to_string()).collect());
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Column widths: the widest cell or header plus two spaces of padding.
    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
                    + 2
            })
            .collect()
    }
}

/// Results that can be rendered as tables.
pub trait Tabular {
    fn tables(&self) -> Vec<Table>;
}

impl Format {
    /// Writes `data` in this format. `color` only affects text output.
    pub fn write<T, W>(&self, data: &T, writer: &mut W, color: bool) -> Result<()>
    where
        T: Serialize + Tabular,
        W: Write,
    {
        match self {
            Format::Json => format_json(data, writer),
            Format::Markdown => data
                .tables()
                .iter()
                .try_for_each(|table| format_markdown(table, writer)),
            Format::Text => data
                .tables()
                .iter()
                .try_for_each(|table| format_text(table, writer, color)),
        }
    }
}

fn format_json<T: Serialize, W: Write>(data: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, data)?;
    writeln!(writer)?;
    Ok(())
}

fn format_markdown<W: Write>(table: &Table, writer: &mut W) -> Result<()> {
    writeln!(writer, "## {}\n", table.title)?;

    if table.rows.is_empty() {
        writeln!(writer, "_No items_\n")?;
    } else {
        write!(writer, "|")?;
        for header in &table.headers {
            write!(writer, " {} |", header)?;
        }
        writeln!(writer)?;

        write!(writer, "|")?;
        for _ in &table.headers {
            write!(writer, " --- |")?;
        }
        writeln!(writer)?;

        for row in &table.rows {
            write!(writer, "|")?;
            for cell in row {
                write!(writer, " {} |", cell.replace('|', "\\|"))?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
    }

    if let Some(footer) = &table.footer {
        writeln!(writer, "{}\n", footer)?;
    }
    Ok(())
}

fn format_text<W: Write>(table: &Table, writer: &mut W, color: bool) -> Result<()> {
    let title = format!("=== {} ===", table.title);
    if color {
        writeln!(writer, "\n{}", title.bold())?;
    } else {
        writeln!(writer, "\n{}", title)?;
    }

    let widths = table.widths();
    let rule = "-".repeat(widths.iter().sum::<usize>().max(20));

    let header: String = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w))
        .collect();
    writeln!(writer, "{}", header.trim_end())?;
    writeln!(writer, "{}", rule)?;

    for row in &table.rows {
        let line: String = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
            .collect();
        writeln!(writer, "{}", line.trim_end())?;
    }
    writeln!(writer, "{}", rule)?;

    if let Some(footer) = &table.footer {
        writeln!(writer, "{}", footer)?;
    }
    Ok(())
}
