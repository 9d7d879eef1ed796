use crate::api::SolveReport;
use crate::error::TfResult;
use crate::geometry::{flat_xs, folded_xs};
use crate::scorer::Mode;
use serde::Serialize;
use std::io::Write;

/// One profile point as written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportRow {
    pub index: usize,
    pub s: f64,
    pub x: f64,
    pub height: f64,
}

pub fn rows(profile: &[f64]) -> Vec<ExportRow> {
    let segments = profile.len().saturating_sub(1).max(1);
    let ss = flat_xs(segments);
    let xs = folded_xs(profile);
    profile
        .iter()
        .enumerate()
        .map(|(i, &height)| ExportRow {
            index: i,
            s: ss.get(i).copied().unwrap_or(0.0),
            x: xs[i],
            height,
        })
        .collect()
}

/// Side-block `Algorithm` value, the same for both modes.
const ALGORITHM: &str = "gradient";

fn score_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Volume => "Volume",
        Mode::Fit => "Deviation",
    }
}

/// Profile table with the run parameters in a side block next to the first rows.
pub fn write_csv<W: Write>(writer: W, report: &SolveReport) -> TfResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(["s", "x", "f(s)", "", "Parameter", "Value"])?;

    let lhat = report
        .lhat
        .map(|l| l.to_string())
        .unwrap_or_else(|| "-".to_string());
    let params: [(&str, String); 4] = [
        ("Algorithm", ALGORITHM.to_string()),
        ("Length", lhat),
        (score_label(report.mode), report.score.to_string()),
        ("Segments", report.segments.to_string()),
    ];

    for (i, row) in rows(&report.profile).iter().enumerate() {
        let mut record = vec![row.s.to_string(), row.x.to_string(), row.height.to_string()];
        if let Some((name, value)) = params.get(i) {
            record.push(String::new());
            record.push(name.to_string());
            record.push(value.clone());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Bare `s,x,f(s)` table.
pub fn write_plain_csv<W: Write>(writer: W, profile: &[f64]) -> TfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["s", "x", "f(s)"])?;
    for row in rows(profile) {
        wtr.write_record([row.s.to_string(), row.x.to_string(), row.height.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
