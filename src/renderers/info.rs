//! Diagnostic renderings of the analyzed layout
//!
//! Each rendering prints one row per input line with a per-token value in
//! place of the token. Lines without spines and manipulator lines are
//! printed unchanged so the output stays aligned with the input.

use crate::models::{Line, Token};
use crate::structure::HumdrumFile;

/// Spine path labels such as `1`, `(1)a`, `(1)b`.
pub fn spine_info(file: &HumdrumFile) -> String {
    render(file, |token| token.spine_info().to_string())
}

/// `track` or `track.subtrack` per token.
pub fn track_info(file: &HumdrumFile) -> String {
    render(file, |token| token.address().track_string())
}

/// Data type without the leading `**`.
pub fn data_type_info(file: &HumdrumFile) -> String {
    render(file, |token| {
        token
            .data_type()
            .trim_start_matches("**")
            .to_string()
    })
}

/// Token durations as mixed fractions (`1_1/2`).
pub fn duration_info(file: &HumdrumFile) -> String {
    render(file, |token| token.duration().to_mixed_string())
}

fn render(file: &HumdrumFile, field: impl Fn(&Token) -> String) -> String {
    let mut output = String::new();
    for line in file.lines() {
        output.push_str(&render_line(line, &field));
        output.push('\n');
    }
    output
}

fn render_line(line: &Line, field: &impl Fn(&Token) -> String) -> String {
    if !line.has_spines() || line.is_manipulator() {
        return line.text().to_string();
    }
    line.tokens()
        .iter()
        .map(field)
        .collect::<Vec<_>>()
        .join("\t")
}
