//! Results Grid Module for hospitaldb
//!
//! Renders query results for the console: an aligned table with a row index
//! column (the default), or CSV, JSON and Markdown.

use crate::core::db::QueryResult;
use crate::core::{HospitalError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Output format selected through configuration or `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = HospitalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(HospitalError::Ui(format!(
                "Unsupported output format: '{}'. Supported formats: table, csv, json, markdown",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Represents the entire grid structure.
#[derive(Debug, Clone, Default)]
pub struct ResultsGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsGrid {
    /// Builds a grid holding the columns and rows of a query result.
    pub fn from_query_result(result: &QueryResult) -> Self {
        ResultsGrid {
            headers: result.columns.clone(),
            rows: result.rows.clone(),
        }
    }

    /// Renders the grid in the requested format.
    pub fn render_as(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.render()),
            OutputFormat::Csv => Ok(self.export_to_csv()),
            OutputFormat::Json => self.export_to_json(),
            OutputFormat::Markdown => Ok(self.export_to_markdown()),
        }
    }

    /// Renders an aligned table. The first column is the zero-based row
    /// index, headers are underlined, every column is padded to its widest
    /// cell.
    pub fn render(&self) -> String {
        if self.headers.is_empty() && self.rows.is_empty() {
            return String::new();
        }

        let index_width = self.rows.len().saturating_sub(1).to_string().len();
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }

        let format_line = |index: &str, cells: &[String]| {
            let mut line = format!("{:<width$}", index, width = index_width);
            for (i, width) in widths.iter().enumerate() {
                let cell = cells.get(i).map(String::as_str).unwrap_or("");
                line.push_str("  ");
                line.push_str(&format!("{:<width$}", cell, width = *width));
            }
            line.trim_end().to_string()
        };

        let mut output = String::new();
        output.push_str(&format_line("", &self.headers));
        output.push('\n');
        let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        output.push_str(&format_line("", &underline));
        output.push('\n');

        for (index, row) in self.rows.iter().enumerate() {
            output.push_str(&format_line(&index.to_string(), row));
            output.push('\n');
        }
        output
    }

    fn export_to_csv(&self) -> String {
        let mut output = String::new();
        if !self.headers.is_empty() {
            output.push_str(&csv_line(&self.headers));
            output.push('\n');
        }
        for row in &self.rows {
            output.push_str(&csv_line(row));
            output.push('\n');
        }
        output
    }

    fn export_to_json(&self) -> Result<String> {
        let rows: Vec<BTreeMap<&str, &str>> = self
            .rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .zip(row.iter())
                    .map(|(header, cell)| (header.as_str(), cell.as_str()))
                    .collect()
            })
            .collect();
        Ok(serde_json::to_string(&rows)?)
    }

    fn export_to_markdown(&self) -> String {
        let mut output = String::new();
        if !self.headers.is_empty() {
            output.push_str(&self.headers.join(" | "));
            output.push('\n');
            let underline: Vec<String> = self.headers.iter().map(|h| "-".repeat(h.len().max(3))).collect();
            output.push_str(&underline.join(" | "));
            output.push('\n');
        }
        for row in &self.rows {
            let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
            output.push_str(&cells.join(" | "));
            output.push('\n');
        }
        output
    }
}

fn csv_line(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| {
            if cell.contains(&[',', '"', '\n'][..]) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
