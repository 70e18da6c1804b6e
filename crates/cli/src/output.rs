// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column-aligned table rendering for list commands.

use chrono::{DateTime, Utc};

/// Render rows under headers with two-space gutters.
///
/// Column widths are computed from the *visible* width of each cell, so
/// colored cells (which carry ANSI escapes) still line up.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| visible_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            widths[i] = widths[i].max(visible_width(cell));
        }
    }

    let mut out = String::new();
    render_row(&mut out, headers.iter().map(|h| h.to_string()).collect::<Vec<_>>().as_slice(), &widths);
    for row in rows {
        render_row(&mut out, row, &widths);
    }
    out
}

fn render_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (i, cell) in cells.iter().enumerate() {
        out.push_str(cell);
        // Last column is never padded, so rows carry no trailing spaces
        if i + 1 < widths.len() {
            let pad = widths[i].saturating_sub(visible_width(cell)) + 2;
            out.push_str(&" ".repeat(pad));
        }
    }
    out.push('\n');
}

/// Width of a cell excluding ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

/// Format an optional timestamp as local-free ISO time, or `-`.
pub fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Format an optional pid, or `-`.
pub fn format_pid(pid: Option<u32>) -> String {
    match pid {
        Some(p) => p.to_string(),
        None => "-".to_string(),
    }
}

/// Format a probe latency in seconds, or `N/A` before the first probe.
pub fn format_response_time(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format!("{s:.3}s"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
