//! Serializable snapshot of an analyzed file
//!
//! Used by the JS-facing API and for JSON export.

use serde::{Deserialize, Serialize};

use crate::models::{Line, Rational, Token};
use crate::parse::LineKind;
use crate::structure::{HumdrumFile, Strand};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub text: String,
    pub line: usize,
    pub field: usize,
    pub track: usize,
    pub subtrack: usize,
    pub spine_info: String,
    pub data_type: String,
    pub duration: Rational,
    pub strand: Option<usize>,
}

impl From<&Token> for TokenSummary {
    fn from(token: &Token) -> Self {
        Self {
            text: token.text().to_string(),
            line: token.line_index(),
            field: token.field_index(),
            track: token.track(),
            subtrack: token.subtrack(),
            spine_info: token.spine_info().to_string(),
            data_type: token.data_type().to_string(),
            duration: token.duration(),
            strand: token.strand_index(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub index: usize,
    pub kind: LineKind,
    pub text: String,
    pub duration: Rational,
    pub duration_from_start: Rational,
    pub duration_from_barline: Rational,
    pub duration_to_barline: Rational,
    pub tokens: Vec<TokenSummary>,
}

impl LineSummary {
    /// Timing only, without per-token detail.
    pub fn timing(line: &Line) -> Self {
        Self {
            tokens: Vec::new(),
            ..Self::from(line)
        }
    }
}

impl From<&Line> for LineSummary {
    fn from(line: &Line) -> Self {
        Self {
            index: line.index(),
            kind: line.kind(),
            text: line.text().to_string(),
            duration: line.duration(),
            duration_from_start: line.duration_from_start(),
            duration_from_barline: line.duration_from_barline(),
            duration_to_barline: line.duration_to_barline(),
            tokens: if line.has_spines() {
                line.tokens().iter().map(TokenSummary::from).collect()
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub valid: bool,
    pub error: String,
    pub line_count: usize,
    pub max_track: usize,
    pub strand_count: usize,
    pub score_duration: Rational,
    pub tpq: i64,
    pub strands: Vec<Strand>,
    pub lines: Vec<LineSummary>,
}

impl From<&HumdrumFile> for FileSummary {
    fn from(file: &HumdrumFile) -> Self {
        Self {
            valid: file.is_valid(),
            error: file.parse_error(),
            line_count: file.line_count(),
            max_track: file.max_track(),
            strand_count: file.strand_count(),
            score_duration: file.score_duration(),
            tpq: file.tpq(),
            strands: file.strands().to_vec(),
            lines: file.lines().iter().map(LineSummary::from).collect(),
        }
    }
}

/// Pretty-printed JSON snapshot of the file.
pub fn to_summary_json(file: &HumdrumFile) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&FileSummary::from(file))
}
