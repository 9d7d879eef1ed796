use super::folded_xs;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Offset that keeps fill lines just inside the edge lines.
const EDGE_GAP: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Blue,
    LightBlue,
    Red,
}

/// One command for the external projection renderer.
///
/// A `Colorize` applies to every `Line` emitted since the previous `Colorize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "camelCase")]
pub enum DrawOp {
    DrawLine([f64; 6]),
    Colorize(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum View {
    Full,
    Quarter,
}

/// Line list plus the camera hints the renderer starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wireframe {
    pub view: View,
    pub scale: f64,
    pub turn: [f64; 3],
    pub ops: Vec<DrawOp>,
}

impl Wireframe {
    pub fn line_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::DrawLine(_)))
            .count()
    }
}

/// `rungs + 1` profile indices spread evenly from 0 to N.
pub fn rung_indices(segments: usize, rungs: usize) -> Vec<usize> {
    let rungs = rungs.max(1);
    (0..=rungs)
        .map(|i| ((i * segments) as f64 / rungs as f64).round() as usize)
        .collect()
}

fn push_group(ops: &mut Vec<DrawOp>, lines: impl Iterator<Item = [f64; 6]>, color: Color) {
    ops.extend(lines.map(DrawOp::DrawLine));
    ops.push(DrawOp::Colorize(color));
}

/// Whole closed box: both end tabs folded up, seen from outside.
pub fn full_wireframe(profile: &[f64], half_length: f64, rungs: usize) -> Wireframe {
    let segments = profile.len().saturating_sub(1);
    let xs = folded_xs(profile);
    let reduced = rung_indices(segments, rungs);

    let cx = |x: f64| x - 0.5;
    let cy = |y: f64| half_length - y;
    let jy = |y: f64| cy(y) - EDGE_GAP;
    let u = profile;

    let mut ops = Vec::new();

    // Top and bottom faces.
    push_group(
        &mut ops,
        reduced
            .iter()
            .map(|&i| [cx(xs[i]), jy(u[i]), u[i], cx(xs[i]), -jy(u[i]), u[i]]),
        Color::Blue,
    );
    push_group(
        &mut ops,
        reduced
            .iter()
            .map(|&i| [cx(xs[i]), jy(u[i]), -u[i], cx(xs[i]), -jy(u[i]), -u[i]]),
        Color::Blue,
    );

    // Tabs.
    push_group(
        &mut ops,
        reduced
            .iter()
            .map(|&i| [cx(xs[i]), jy(u[i]), u[i], cx(xs[i]), jy(u[i]), -u[i]]),
        Color::LightBlue,
    );
    push_group(
        &mut ops,
        reduced
            .iter()
            .map(|&i| [cx(xs[i]), -jy(u[i]), u[i], cx(xs[i]), -jy(u[i]), -u[i]]),
        Color::LightBlue,
    );

    // Fold edges, one segment at a time, mirrored into all four corners.
    for (sy, sz) in [(1.0, 1.0), (1.0, -1.0), (-1.0, 1.0), (-1.0, -1.0)] {
        push_group(
            &mut ops,
            (1..=segments).map(|j| {
                [
                    cx(xs[j - 1]),
                    sy * cy(u[j - 1]),
                    sz * u[j - 1],
                    cx(xs[j]),
                    sy * cy(u[j]),
                    sz * u[j],
                ]
            }),
            Color::Red,
        );
    }

    Wireframe {
        view: View::Full,
        scale: 0.7 * (0.5 + half_length).sqrt(),
        turn: [-5.0, 0.0, 3.0],
        ops,
    }
}

/// One quarter of the box, cut along both symmetry planes.
pub fn quarter_wireframe(profile: &[f64], half_length: f64, rungs: usize) -> Wireframe {
    let segments = profile.len().saturating_sub(1);
    let xs = folded_xs(profile);
    let reduced = rung_indices(segments, rungs);

    let cx = |x: f64| x - 0.5;
    let cy = |y: f64| 0.5 * half_length - y;
    let jy = |y: f64| cy(y) - EDGE_GAP;
    let u = profile;

    let mut ops = Vec::new();

    push_group(
        &mut ops,
        reduced
            .iter()
            .map(|&i| [cx(xs[i]), jy(u[i]), u[i], cx(xs[i]), jy(half_length), u[i]]),
        Color::Blue,
    );
    push_group(
        &mut ops,
        reduced
            .iter()
            .map(|&i| [cx(xs[i]), jy(u[i]), u[i], cx(xs[i]), jy(u[i]), 0.0]),
        Color::LightBlue,
    );
    push_group(
        &mut ops,
        (1..=segments).map(|j| {
            [
                cx(xs[j - 1]),
                cy(u[j - 1]),
                u[j - 1],
                cx(xs[j]),
                cy(u[j]),
                u[j],
            ]
        }),
        Color::Red,
    );
    push_group(
        &mut ops,
        (1..=segments).map(|j| [cx(xs[j - 1]), cy(u[j - 1]), 0.0, cx(xs[j]), cy(u[j]), 0.0]),
        Color::LightBlue,
    );
    push_group(
        &mut ops,
        (1..=segments).map(|j| {
            [
                cx(xs[j - 1]),
                cy(half_length),
                u[j - 1],
                cx(xs[j]),
                cy(half_length),
                u[j],
            ]
        }),
        Color::Blue,
    );
    if segments > 0 {
        push_group(
            &mut ops,
            std::iter::once([
                cx(xs[0]),
                cy(half_length),
                0.0,
                cx(xs[segments]),
                cy(half_length),
                0.0,
            ]),
            Color::Blue,
        );
    }

    Wireframe {
        view: View::Quarter,
        scale: 1.2 * (0.5 + half_length).sqrt(),
        turn: [-2.3, 0.3, 0.0],
        ops,
    }
}

pub fn build(view: View, profile: &[f64], half_length: f64, rungs: usize) -> Wireframe {
    match view {
        View::Full => full_wireframe(profile, half_length, rungs),
        View::Quarter => quarter_wireframe(profile, half_length, rungs),
    }
}
