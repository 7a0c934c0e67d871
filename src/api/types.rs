//! Shared types for the WASM API

use serde::{Deserialize, Serialize};

use crate::models::Rational;
use crate::structure::HumdrumFile;

/// Result of loading a document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub valid: bool,
    pub error: String,
    pub line_count: usize,
    pub max_track: usize,
    pub strand_count: usize,
    pub score_duration: Rational,
}

impl From<&HumdrumFile> for LoadSummary {
    fn from(file: &HumdrumFile) -> Self {
        Self {
            valid: file.is_valid(),
            error: file.parse_error(),
            line_count: file.line_count(),
            max_track: file.max_track(),
            strand_count: file.strand_count(),
            score_duration: file.score_duration(),
        }
    }
}

/// Which diagnostic table `getInfo` should render
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InfoKind {
    Spine,
    Track,
    DataType,
    Duration,
}

impl InfoKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "spine" => Some(InfoKind::Spine),
            "track" => Some(InfoKind::Track),
            "dataType" => Some(InfoKind::DataType),
            "duration" => Some(InfoKind::Duration),
            _ => None,
        }
    }
}
