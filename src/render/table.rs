use std::str::FromStr;

use crate::errors::{Result, TpologyError};
use crate::resource::Resource;

/// Output style for a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Markdown,
    Csv,
}

impl FromStr for TableFormat {
    type Err = TpologyError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "table" | "markdown" => Ok(TableFormat::Markdown),
            "csv" => Ok(TableFormat::Csv),
            other => Err(TpologyError::Render {
                message: format!("unknown table format: {}", other),
            }),
        }
    }
}

/// A simple column-aligned text table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; it must have one cell per column.
    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) -> Result<()> {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(TpologyError::Render {
                message: format!(
                    "row has {} cells but table has {} columns",
                    row.len(),
                    self.columns.len()
                ),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn render(&self, format: TableFormat) -> Result<String> {
        match format {
            TableFormat::Markdown => Ok(self.to_markdown()),
            TableFormat::Csv => self.to_csv(),
        }
    }

    /// Column widths: the widest of the header and every cell, in characters.
    fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                self.rows
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(c.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn to_markdown(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        let line = |cells: &[String]| {
            let mut s = String::from("|");
            for (cell, w) in cells.iter().zip(&widths) {
                s.push_str(&format!(" {:<w$} |", cell, w = *w));
            }
            s.push('\n');
            s
        };

        out.push_str(&line(&self.columns));
        out.push('|');
        for w in &widths {
            out.push_str(&format!("-{}-|", "-".repeat(*w)));
        }
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
        }
        out
    }

    /// Header plus rows as RFC 4180 CSV with `\n` line endings.
    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in std::iter::once(&self.columns).chain(&self.rows) {
            wtr.write_record(row)?;
        }
        let bytes = wtr.into_inner().map_err(|e| TpologyError::Render {
            message: format!("failed to flush csv: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| TpologyError::Render {
            message: format!("csv output is not utf-8: {}", e),
        })
    }
}

/// Kind / Name / Description / Owner listing.
pub fn resource_table<'r>(resources: impl IntoIterator<Item = &'r Resource>) -> Result<Table> {
    let mut table = Table::new(["Kind", "Name", "Description", "Owner"]);
    for r in resources {
        table.push_row([
            r.kind(),
            r.name(),
            r.description(),
            r.owner(),
        ])?;
    }
    Ok(table)
}

/// Single-column listing of kind names.
pub fn kind_table<'k>(kinds: impl IntoIterator<Item = &'k str>) -> Result<Table> {
    let mut table = Table::new(["Name"]);
    for k in kinds {
        table.push_row([k])?;
    }
    Ok(table)
}
