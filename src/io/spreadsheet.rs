use crate::error::{TabFoldError, TfResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_) => None,
        }
    }
}

/// Ragged table of cells; fields may be separated by commas or spaces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    pub fn parse<R: Read>(reader: R) -> TfResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let row: Vec<Cell> = record
                .iter()
                .flat_map(|field| field.split(' '))
                .map(Cell::parse)
                .collect();
            rows.push(row);
        }
        debug!("Parsed sheet with {} rows", rows.len());
        Ok(Self { rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> TfResult<Self> {
        Self::parse(File::open(path)?)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Width of the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Numeric cells per column.
    pub fn numeric_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.width()];
        for row in &self.rows {
            for (j, cell) in row.iter().enumerate() {
                if cell.as_number().is_some() {
                    counts[j] += 1;
                }
            }
        }
        counts
    }

    /// Swaps rows and columns; short rows leave empty text cells behind.
    pub fn transpose(&self) -> Self {
        let width = self.width();
        let mut pivot: Vec<Vec<Cell>> = vec![Vec::with_capacity(self.rows.len()); width];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let target = &mut pivot[j];
                while target.len() < i {
                    target.push(Cell::Text(String::new()));
                }
                target.push(cell.clone());
            }
        }
        Self { rows: pivot }
    }

    /// Numbers found in column `col`, top to bottom. Other cells are skipped.
    pub fn column(&self, col: usize) -> TfResult<Vec<f64>> {
        if col >= self.width() {
            return Err(TabFoldError::Validation(format!(
                "column {} does not exist; the sheet has {} columns",
                col,
                self.width()
            )));
        }

        let mut values = Vec::with_capacity(self.rows.len());
        let mut skipped = 0;
        for row in &self.rows {
            match row.get(col) {
                Some(Cell::Number(v)) => values.push(*v),
                Some(Cell::Text(t)) if !t.is_empty() => skipped += 1,
                _ => {}
            }
        }
        if skipped > 0 {
            warn!("Skipped {} non-numeric cells in column {}", skipped, col);
        }
        Ok(values)
    }
}

/// Reads a target curve from column `column` of a CSV or space-separated file.
pub fn load_target<P: AsRef<Path>>(path: P, column: usize, transpose: bool) -> TfResult<Vec<f64>> {
    let sheet = Sheet::from_path(path)?;
    let sheet = if transpose { sheet.transpose() } else { sheet };
    sheet.column(column)
}

/// Linear resample onto `segments + 1` evenly spaced points; both ends are forced to 0.
pub fn resample(values: &[f64], segments: usize) -> TfResult<Vec<f64>> {
    if values.len() < 2 {
        return Err(TabFoldError::Validation(format!(
            "need at least 2 samples to resample, got {}",
            values.len()
        )));
    }
    if segments == 0 {
        return Err(TabFoldError::Config(
            "segments (N) must be at least 1".to_string(),
        ));
    }

    let last = (values.len() - 1) as f64;
    let mut out: Vec<f64> = (0..=segments)
        .map(|i| {
            let pos = i as f64 / segments as f64 * last;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(values.len() - 1);
            let frac = pos - lo as f64;
            values[lo] + (values[hi] - values[lo]) * frac
        })
        .collect();
    out[0] = 0.0;
    out[segments] = 0.0;
    Ok(out)
}
