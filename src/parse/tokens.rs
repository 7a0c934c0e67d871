//! Token and line recognition
//!
//! Pure functions classifying raw field and line text. Structural meaning is
//! determined by exact text only, so these carry no state.

use serde::{Deserialize, Serialize};

/// Structural interpretations that change the spine layout
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Manipulator {
    /// `**type`: declares a spine's data type
    Exclusive,
    /// `*^`
    Split,
    /// `*v`
    Merge,
    /// `*x`
    Exchange,
    /// `*+`
    Add,
    /// `*-`
    Terminate,
}

/// What a whole input line is
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineKind {
    Empty,
    GlobalComment,
    Reference,
    LocalComment,
    Exclusive,
    Interpretation,
    Barline,
    Data,
}

impl LineKind {
    /// Lines without spines are excluded from track and link analysis.
    pub fn has_spines(self) -> bool {
        !matches!(
            self,
            LineKind::Empty | LineKind::GlobalComment | LineKind::Reference
        )
    }
}

pub struct TokenRecognizer;

impl TokenRecognizer {
    pub fn manipulator(text: &str) -> Option<Manipulator> {
        match text {
            "*^" => Some(Manipulator::Split),
            "*v" => Some(Manipulator::Merge),
            "*x" => Some(Manipulator::Exchange),
            "*+" => Some(Manipulator::Add),
            "*-" => Some(Manipulator::Terminate),
            _ if Self::is_exclusive(text) => Some(Manipulator::Exclusive),
            _ => None,
        }
    }

    pub fn is_exclusive(text: &str) -> bool {
        text.starts_with("**")
    }

    /// `.` for data, `*` for interpretations, `!` for local comments
    pub fn is_null(text: &str) -> bool {
        matches!(text, "." | "*" | "!")
    }

    pub fn is_interpretation(text: &str) -> bool {
        text.starts_with('*')
    }

    pub fn is_barline(text: &str) -> bool {
        text.starts_with('=')
    }

    pub fn is_comment(text: &str) -> bool {
        text.starts_with('!')
    }

    pub fn is_local_comment(text: &str) -> bool {
        text.starts_with('!') && !text.starts_with("!!")
    }

    pub fn is_global_comment(text: &str) -> bool {
        text.starts_with("!!")
    }

    pub fn is_data(text: &str) -> bool {
        !text.is_empty()
            && !Self::is_interpretation(text)
            && !Self::is_barline(text)
            && !Self::is_comment(text)
    }

    /// `!!!key: value` with a non-empty key free of spaces.
    pub fn is_reference(text: &str) -> bool {
        Self::reference_parts(text).is_some()
    }

    /// Split a reference record into trimmed key and value.
    pub fn reference_parts(text: &str) -> Option<(&str, &str)> {
        let body = text.strip_prefix("!!!")?;
        if body.starts_with('!') || text.len() < 5 {
            return None;
        }
        let colon = body.find(':')?;
        let key = &body[..colon];
        if key.is_empty() || key.contains([' ', '\t']) {
            return None;
        }
        Some((key, body[colon + 1..].trim()))
    }

    pub fn classify_line(text: &str) -> LineKind {
        if text.is_empty() {
            LineKind::Empty
        } else if Self::is_reference(text) {
            LineKind::Reference
        } else if Self::is_global_comment(text) {
            LineKind::GlobalComment
        } else if Self::is_comment(text) {
            LineKind::LocalComment
        } else if Self::is_exclusive(text) {
            LineKind::Exclusive
        } else if Self::is_interpretation(text) {
            LineKind::Interpretation
        } else if Self::is_barline(text) {
            LineKind::Barline
        } else {
            LineKind::Data
        }
    }
}
