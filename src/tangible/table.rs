//! Typed tables exchanged with the model as semicolon-separated CSV.
//!
//! Parsing is lenient per line: a line that does not yield a full typed row
//! is skipped, and only a reply with no usable line fails as a whole.

use serde::{Deserialize, Serialize};

use super::parse::{boolean_token, parse_number};

/// A typed table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Column {
    Text { name: String },
    Boolean { name: String },
    Number { name: String },
    /// Values must be exactly one of `options`.
    Enum { name: String, options: Vec<String> },
}

impl Column {
    pub fn text(name: impl Into<String>) -> Self {
        Self::Text { name: name.into() }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::Boolean { name: name.into() }
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::Number { name: name.into() }
    }

    pub fn enumeration(name: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Enum { name: name.into(), options: options.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Text { name } | Self::Boolean { name } | Self::Number { name } | Self::Enum { name, .. } => name,
        }
    }
}

/// A typed cell. Carries the column it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cell {
    Text { value: String, column: Column },
    Boolean { value: bool, column: Column },
    Number { value: f64, column: Column },
    Enum { value: String, column: Column },
}

impl Cell {
    #[must_use]
    pub fn column(&self) -> &Column {
        match self {
            Self::Text { column, .. }
            | Self::Boolean { column, .. }
            | Self::Number { column, .. }
            | Self::Enum { column, .. } => column,
        }
    }

    /// Text form used when a table is rendered back into a prompt.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text { value, .. } | Self::Enum { value, .. } => value.clone(),
            Self::Boolean { value, .. } => value.to_string(),
            Self::Number { value, .. } => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// True when the row has one cell per column, in column order.
    #[must_use]
    pub fn matches(&self, columns: &[Column]) -> bool {
        self.cells.len() == columns.len() && self.cells.iter().zip(columns).all(|(cell, col)| cell.column() == col)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns, rows: Vec::new() }
    }
}

// =============================================================================
// PROMPT RENDERING
// =============================================================================

/// One-line description of a column for format instructions.
#[must_use]
pub fn describe_column(column: &Column) -> String {
    match column {
        Column::Text { name } => format!("{name}: String"),
        Column::Boolean { name } => format!("{name}: Boolean (true or false)"),
        Column::Number { name } => format!("{name}: Number (any number including decimal)"),
        Column::Enum { name, options } => {
            format!("{name}: One of the following (others are unacceptable): {}", options.join(", "))
        }
    }
}

/// Render a table as CSV text for inclusion in a prompt.
#[must_use]
pub fn render_table(table: &Table) -> String {
    let names: Vec<&str> = table.columns.iter().map(Column::name).collect();
    let mut out = format!("csv file format (semicolon separated) with columns: {}\n", names.join(";"));
    for row in &table.rows {
        let fields: Vec<String> = row.cells.iter().map(Cell::render).collect();
        out.push_str(&fields.join(";"));
        out.push('\n');
    }
    out
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a CSV reply into rows of `columns`.
///
/// Returns `None` when no line yields a complete row.
#[must_use]
pub fn parse_table(columns: &[Column], reply: &str) -> Option<Table> {
    if columns.is_empty() {
        return None;
    }
    let rows: Vec<Row> = reply
        .lines()
        .map(str::trim)
        .filter(|line| is_data_line(columns, line))
        .map(split_fields)
        .enumerate()
        .filter(|(position, fields)| *position > 0 || !is_header(columns, fields))
        .filter_map(|(_, fields)| parse_row(columns, &fields))
        .collect();
    if rows.is_empty() {
        None
    } else {
        Some(Table { columns: columns.to_vec(), rows })
    }
}

/// Lines without a separator are preamble, except in a one-column table where
/// only a line introducing the data (ending in ':') is.
fn is_data_line(columns: &[Column], line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    line.contains(';') || (columns.len() == 1 && !line.ends_with(':'))
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split(';')
        .map(|field| field.trim().trim_matches('"').trim())
        .collect()
}

/// A line that repeats the column names. Only checked on the first data line.
fn is_header(columns: &[Column], fields: &[&str]) -> bool {
    fields.len() >= columns.len()
        && columns
            .iter()
            .zip(fields)
            .all(|(col, field)| col.name().eq_ignore_ascii_case(field))
}

/// Extra trailing fields are ignored; a missing or invalid field skips the row.
fn parse_row(columns: &[Column], fields: &[&str]) -> Option<Row> {
    let cells = columns
        .iter()
        .enumerate()
        .map(|(i, column)| parse_cell(column, fields.get(i)?))
        .collect::<Option<Vec<_>>>()?;
    Some(Row { cells })
}

fn parse_cell(column: &Column, field: &str) -> Option<Cell> {
    let column_ref = column.clone();
    match column {
        Column::Text { .. } => Some(Cell::Text { value: field.to_string(), column: column_ref }),
        Column::Boolean { .. } => {
            let value = boolean_token(&field.to_ascii_lowercase())?;
            Some(Cell::Boolean { value, column: column_ref })
        }
        Column::Number { .. } => Some(Cell::Number { value: parse_number(field)?, column: column_ref }),
        Column::Enum { options, .. } => options
            .iter()
            .any(|o| o == field)
            .then(|| Cell::Enum { value: field.to_string(), column: column_ref }),
    }
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
