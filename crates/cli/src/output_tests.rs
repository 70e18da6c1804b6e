// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::color;

#[test]
fn table_aligns_columns() {
    let rendered = table(
        &["HOST", "PORT", "STATUS"],
        &[
            vec!["1.1.1.1".to_string(), "9001".to_string(), "online".to_string()],
            vec!["10.20.30.40".to_string(), "80".to_string(), "offline".to_string()],
        ],
    );
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "HOST         PORT  STATUS");
    assert_eq!(lines[1], "1.1.1.1      9001  online");
    assert_eq!(lines[2], "10.20.30.40  80    offline");
}

#[test]
fn colored_cells_do_not_skew_alignment() {
    let plain = table(
        &["ID", "STATUS"],
        &[vec!["wld-1".to_string(), "running".to_string()]],
    );
    let colored = table(
        &["ID", "STATUS"],
        &[vec![
            "wld-1".to_string(),
            color::paint(color::codes::OK, "running", true),
        ]],
    );
    // Strip escapes from the colored output and the layouts must match
    let stripped: String = colored
        .replace("\x1b[38;5;114m", "")
        .replace("\x1b[0m", "");
    assert_eq!(stripped, plain);
}

#[test]
fn paint_is_identity_when_disabled() {
    assert_eq!(color::paint(color::codes::ERR, "offline", false), "offline");
    assert!(color::paint(color::codes::ERR, "offline", true).contains("\x1b[38;5;167m"));
}

#[test]
fn format_helpers_render_placeholders() {
    assert_eq!(format_pid(None), "-");
    assert_eq!(format_pid(Some(42)), "42");
    assert_eq!(format_time(None), "-");
}

#[yare::parameterized(
    unprobed   = { None, "N/A" },
    fast       = { Some(0.01234), "0.012s" },
    slow       = { Some(1.5), "1.500s" },
    zero       = { Some(0.0), "0.000s" },
)]
fn response_time_formatting(seconds: Option<f64>, expected: &str) {
    assert_eq!(format_response_time(seconds), expected);
}

#[test]
fn format_time_is_second_resolution() {
    let t = chrono::DateTime::parse_from_rfc3339("2026-03-04T05:06:07Z")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(format_time(Some(t)), "2026-03-04 05:06:07");
}
