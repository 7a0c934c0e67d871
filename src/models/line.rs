//! One input row and its tokens

use super::params::AttributeStore;
use super::rational::Rational;
use super::token::Token;
use crate::parse::tokens::{LineKind, TokenRecognizer};

/// Field separator inside a line
pub const FIELD_SEPARATOR: char = '\t';

#[derive(Clone, Debug)]
pub struct Line {
    text: String,
    kind: LineKind,
    index: usize,
    tokens: Vec<Token>,
    pub(crate) params: AttributeStore,
    /// Time until the next line, in quarter notes
    pub(crate) duration: Rational,
    /// Time from the start of the file
    pub(crate) duration_from_start: Rational,
    /// Time since the last barline
    pub(crate) duration_from_barline: Rational,
    /// Time remaining until the next barline
    pub(crate) duration_to_barline: Rational,
}

impl Line {
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        let text = text.into();
        let mut line = Self {
            kind: TokenRecognizer::classify_line(&text),
            text,
            index,
            tokens: Vec::new(),
            params: AttributeStore::new(),
            duration: unset(),
            duration_from_start: unset(),
            duration_from_barline: unset(),
            duration_to_barline: unset(),
        };
        line.tokenize();
        line
    }

    /// Split the text into tokens. Lines without spines become one token.
    pub(crate) fn tokenize(&mut self) {
        let index = self.index;
        self.kind = TokenRecognizer::classify_line(&self.text);
        self.tokens = if self.kind.has_spines() {
            self.text
                .split(FIELD_SEPARATOR)
                .enumerate()
                .map(|(field, text)| Token::new(text, index, field))
                .collect()
        } else {
            vec![Token::new(self.text.as_str(), index, 0)]
        };
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn clear_analysis(&mut self) {
        self.params = AttributeStore::new();
        self.duration = unset();
        self.duration_from_start = unset();
        self.duration_from_barline = unset();
        self.duration_to_barline = unset();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and re-tokenize. Structural analysis of the owning
    /// file becomes stale until it is analyzed again.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.tokenize();
    }

    /// Regenerate the line text from the current token texts.
    pub fn rebuild_text(&mut self) {
        self.text = self
            .tokens
            .iter()
            .map(Token::text)
            .collect::<Vec<_>>()
            .join("\t");
        self.kind = TokenRecognizer::classify_line(&self.text);
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, field: usize) -> Option<&Token> {
        self.tokens.get(field)
    }

    pub fn token_mut(&mut self, field: usize) -> Option<&mut Token> {
        self.tokens.get_mut(field)
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut [Token] {
        &mut self.tokens
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn params(&self) -> &AttributeStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut AttributeStore {
        &mut self.params
    }

    // ========================================================================
    // Line kinds
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.kind == LineKind::Empty
    }

    pub fn has_spines(&self) -> bool {
        self.kind.has_spines()
    }

    /// Empty lines and `!!` lines (including reference records).
    pub fn is_global(&self) -> bool {
        !self.has_spines()
    }

    pub fn is_comment(&self) -> bool {
        TokenRecognizer::is_comment(&self.text)
    }

    pub fn is_local_comment(&self) -> bool {
        self.kind == LineKind::LocalComment
    }

    pub fn is_global_comment(&self) -> bool {
        matches!(self.kind, LineKind::GlobalComment | LineKind::Reference)
    }

    pub fn is_reference(&self) -> bool {
        self.kind == LineKind::Reference
    }

    pub fn reference_key(&self) -> Option<&str> {
        TokenRecognizer::reference_parts(&self.text).map(|(key, _)| key)
    }

    pub fn reference_value(&self) -> Option<&str> {
        TokenRecognizer::reference_parts(&self.text).map(|(_, value)| value)
    }

    pub fn is_exclusive(&self) -> bool {
        self.kind == LineKind::Exclusive
    }

    pub fn is_interpretation(&self) -> bool {
        matches!(self.kind, LineKind::Exclusive | LineKind::Interpretation)
    }

    pub fn is_barline(&self) -> bool {
        self.kind == LineKind::Barline
    }

    pub fn is_data(&self) -> bool {
        self.kind == LineKind::Data
    }

    /// Any token on the line changes the spine layout.
    pub fn is_manipulator(&self) -> bool {
        self.has_spines() && self.tokens.iter().any(Token::is_manipulator)
    }

    /// Every token terminates its spine.
    pub fn is_terminator(&self) -> bool {
        self.has_spines() && self.tokens.iter().all(Token::is_terminator)
    }

    pub fn is_all_null(&self) -> bool {
        self.has_spines() && self.tokens.iter().all(Token::is_null)
    }

    /// Every token in a rhythm-bearing spine is null.
    pub fn is_all_rhythmic_null(&self) -> bool {
        self.has_spines()
            && self
                .tokens
                .iter()
                .filter(|token| token.has_rhythm())
                .all(Token::is_null)
    }

    // ========================================================================
    // Timing (quarter notes, negative when not analyzed)
    // ========================================================================

    pub fn duration(&self) -> Rational {
        self.duration
    }

    pub fn duration_from_start(&self) -> Rational {
        self.duration_from_start
    }

    pub fn duration_from_barline(&self) -> Rational {
        self.duration_from_barline
    }

    pub fn duration_to_barline(&self) -> Rational {
        self.duration_to_barline
    }

    /// Measure length around this line; on a barline, the measure it opens.
    pub fn barline_duration(&self) -> Rational {
        if self.is_barline() {
            self.duration_to_barline
        } else {
            self.duration_from_barline + self.duration_to_barline
        }
    }

    /// 1-based beat position inside the measure.
    pub fn beat(&self, beat_duration: Rational) -> Rational {
        if beat_duration.is_zero() {
            return Rational::zero();
        }
        self.duration_from_barline / beat_duration + 1
    }

    /// Negative durations are stored as zero.
    pub(crate) fn set_duration(&mut self, duration: Rational) {
        self.duration = if duration.is_negative() {
            Rational::zero()
        } else {
            duration
        };
    }
}

fn unset() -> Rational {
    Rational::from_integer(-1)
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
