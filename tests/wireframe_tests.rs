use rstest::rstest;
use tabfold::geometry::wireframe::{
    build, full_wireframe, quarter_wireframe, rung_indices, Color, DrawOp, View,
};

const PROFILE: [f64; 5] = [0.0, 0.2, 0.3, 0.2, 0.0];

#[rstest]
#[case(4, 2, vec![0, 2, 4])]
#[case(4, 4, vec![0, 1, 2, 3, 4])]
#[case(10, 3, vec![0, 3, 7, 10])]
#[case(4, 0, vec![0, 4])]
fn test_rung_indices(#[case] segments: usize, #[case] rungs: usize, #[case] expected: Vec<usize>) {
    assert_eq!(rung_indices(segments, rungs), expected);
}

#[test]
fn test_full_wireframe_groups() {
    let frame = full_wireframe(&PROFILE, 0.7, 2);
    // Four rung groups of 3 lines plus four edge groups of N lines.
    assert_eq!(frame.line_count(), 4 * 3 + 4 * 4);

    let colors: Vec<Color> = frame
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Colorize(c) => Some(*c),
            DrawOp::DrawLine(_) => None,
        })
        .collect();
    assert_eq!(
        colors,
        vec![
            Color::Blue,
            Color::Blue,
            Color::LightBlue,
            Color::LightBlue,
            Color::Red,
            Color::Red,
            Color::Red,
            Color::Red,
        ]
    );
    assert!(matches!(frame.ops.last(), Some(DrawOp::Colorize(Color::Red))));
}

#[test]
fn test_full_wireframe_is_mirror_symmetric() {
    let frame = full_wireframe(&PROFILE, 0.7, 4);
    for op in &frame.ops {
        if let DrawOp::DrawLine(l) = op {
            assert!(l.iter().all(|v| v.is_finite()));
            assert!(l[0].abs() <= 0.5 + 1e-12);
            assert!(l[3].abs() <= 0.5 + 1e-12);
        }
    }
    let first_top = frame.ops.iter().find_map(|op| match op {
        DrawOp::DrawLine(l) => Some(*l),
        _ => None,
    });
    let top = first_top.unwrap();
    assert_eq!(top[1], -top[4]);
}

#[test]
fn test_quarter_wireframe_line_count() {
    let frame = quarter_wireframe(&PROFILE, 0.7, 2);
    // Rung groups: 3 + 3. Edge groups: 4 + 4 + 4. Closing base line: 1.
    assert_eq!(frame.line_count(), 19);
    assert_eq!(frame.view, View::Quarter);
}

#[test]
fn test_build_dispatches_on_view() {
    assert_eq!(build(View::Full, &PROFILE, 0.7, 2).view, View::Full);
    assert_eq!(build(View::Quarter, &PROFILE, 0.7, 2).view, View::Quarter);
    let view: View = "quarter".parse().unwrap();
    assert_eq!(view, View::Quarter);
}

#[test]
fn test_draw_ops_serialize_for_renderer() {
    let frame = full_wireframe(&PROFILE, 0.7, 1);
    let json = serde_json::to_value(&frame).unwrap();
    let ops = json["ops"].as_array().unwrap();
    assert_eq!(ops[0]["op"], "drawLine");
    assert_eq!(ops[0]["args"].as_array().unwrap().len(), 6);

    let colorize = ops.iter().find(|o| o["op"] == "colorize").unwrap();
    assert_eq!(colorize["args"], "blue");
    assert!(ops.iter().any(|o| o["args"] == "lightblue"));
    assert_eq!(json["view"], "full");
}
