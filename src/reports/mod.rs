use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tabfold::api::SolveReport;
use tabfold::scorer::Mode;

fn score_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Volume => "Volume",
        Mode::Fit => "Deviation",
    }
}

pub fn print_summary(report: &SolveReport) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Mode").add_attribute(Attribute::Bold),
        Cell::new("Segments"),
        Cell::new("Lhat"),
        Cell::new("Generations"),
        Cell::new(score_name(report.mode)).fg(Color::Cyan),
    ]);

    let lhat = report
        .lhat
        .map(|l| format!("{:.4}", l))
        .unwrap_or_else(|| "-".to_string());
    table.add_row(vec![
        Cell::new(report.mode.to_string()),
        Cell::new(report.segments),
        Cell::new(lhat),
        Cell::new(report.generations),
        Cell::new(format!("{:.8}", report.score)).add_attribute(Attribute::Bold),
    ]);

    for i in 1..=4 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}

/// Shows `samples + 1` evenly spread points of the profile.
pub fn print_profile(report: &SolveReport, samples: usize) {
    let segments = report.profile.len().saturating_sub(1);
    if segments == 0 {
        return;
    }
    let samples = samples.clamp(1, segments);

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["i", "s", "x", "f(s)"]);

    let mut last = usize::MAX;
    for k in 0..=samples {
        let i = ((k * segments) as f64 / samples as f64).round() as usize;
        if i == last {
            continue;
        }
        last = i;
        table.add_row(vec![
            Cell::new(i),
            Cell::new(format!("{:.4}", i as f64 / segments as f64)),
            Cell::new(format!("{:.4}", report.xs[i])),
            Cell::new(format!("{:.6}", report.profile[i])),
        ]);
    }

    for i in 0..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("\nProfile:\n{}", table);
}

pub fn print_scan(reports: &[SolveReport]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Lhat").add_attribute(Attribute::Bold),
        Cell::new("Volume").fg(Color::Cyan),
        Cell::new("Peak f(s)"),
        Cell::new("Width"),
    ]);

    let best = reports
        .iter()
        .map(|r| r.score)
        .fold(f64::NEG_INFINITY, f64::max);

    for r in reports {
        let peak = r.profile.iter().copied().fold(0.0, f64::max);
        let width = match (r.xs.first(), r.xs.last()) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        };
        let mut volume = Cell::new(format!("{:.6}", r.score));
        if r.score == best {
            volume = volume.fg(Color::Green).add_attribute(Attribute::Bold);
        }
        table.add_row(vec![
            Cell::new(format!("{:.4}", r.lhat.unwrap_or(0.0))),
            volume,
            Cell::new(format!("{:.6}", peak)),
            Cell::new(format!("{:.6}", width)),
        ]);
    }

    for i in 0..=3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    println!("{}", table);
}
