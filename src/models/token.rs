//! Tokens: the individual cells of a line
//!
//! Tokens never own each other. Links to neighbouring tokens in the same
//! spine are [`TokenId`] handles resolved through the owning file.

use serde::{Deserialize, Serialize};

use super::address::Address;
use super::params::{is_parameter_body, AttributeStore};
use super::rational::Rational;
use crate::parse::kern;
use crate::parse::rhythm;
use crate::parse::tokens::{Manipulator, TokenRecognizer};

/// Position of a token in its file: line index and field index
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId {
    pub line: usize,
    pub field: usize,
}

impl TokenId {
    pub fn new(line: usize, field: usize) -> Self {
        Self { line, field }
    }
}

#[derive(Clone, Debug)]
pub struct Token {
    text: String,
    pub(crate) address: Address,
    pub(crate) params: AttributeStore,
    /// Quarter-note duration; negative when the token has none
    pub(crate) duration: Rational,
    pub(crate) strand: Option<usize>,
    pub(crate) null_resolution: Option<TokenId>,
    pub(crate) next: Vec<TokenId>,
    pub(crate) previous: Vec<TokenId>,
    pub(crate) next_non_null: Vec<TokenId>,
    pub(crate) previous_non_null: Vec<TokenId>,
}

impl Token {
    pub fn new(text: impl Into<String>, line: usize, field: usize) -> Self {
        Self {
            text: text.into(),
            address: Address::new(line, field),
            params: AttributeStore::new(),
            duration: Rational::from_integer(-1),
            strand: None,
            null_resolution: None,
            next: Vec::new(),
            previous: Vec::new(),
            next_non_null: Vec::new(),
            previous_non_null: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the token text.
    ///
    /// Analysis re-tokenizes from line text, so call
    /// `HumdrumFile::rebuild_line_text` before re-analyzing or the edit is lost.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn id(&self) -> TokenId {
        self.address.id()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn line_index(&self) -> usize {
        self.address.line
    }

    pub fn field_index(&self) -> usize {
        self.address.field
    }

    pub fn track(&self) -> usize {
        self.address.track
    }

    pub fn subtrack(&self) -> usize {
        self.address.subtrack
    }

    pub fn spine_info(&self) -> &str {
        &self.address.spine_info
    }

    pub fn data_type(&self) -> &str {
        &self.address.data_type
    }

    /// Compare the data type with or without the leading `**`.
    pub fn is_data_type(&self, data_type: &str) -> bool {
        let own = self.data_type();
        if data_type.starts_with("**") {
            own == data_type
        } else {
            own.strip_prefix("**") == Some(data_type)
        }
    }

    pub fn is_kern(&self) -> bool {
        self.is_data_type("**kern")
    }

    pub fn has_rhythm(&self) -> bool {
        rhythm::is_rhythm_type(self.data_type())
    }

    pub fn params(&self) -> &AttributeStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut AttributeStore {
        &mut self.params
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// Duration in quarter notes, or a negative value for tokens without one.
    pub fn duration(&self) -> Rational {
        self.duration
    }

    pub fn has_duration(&self) -> bool {
        self.duration.is_non_negative()
    }

    /// Derive the duration from the token text.
    ///
    /// Only non-null data in rhythm-bearing spines has a duration.
    pub(crate) fn analyze_duration(&mut self) {
        self.duration = if self.has_rhythm() && self.is_non_null_data() {
            rhythm::quarter_duration(&self.text)
        } else {
            Rational::from_integer(-1)
        };
    }

    // ========================================================================
    // Links
    // ========================================================================

    pub fn next_tokens(&self) -> &[TokenId] {
        &self.next
    }

    pub fn previous_tokens(&self) -> &[TokenId] {
        &self.previous
    }

    pub fn next_token(&self, index: usize) -> Option<TokenId> {
        self.next.get(index).copied()
    }

    pub fn previous_token(&self, index: usize) -> Option<TokenId> {
        self.previous.get(index).copied()
    }

    pub fn next_non_null_tokens(&self) -> &[TokenId] {
        &self.next_non_null
    }

    pub fn previous_non_null_tokens(&self) -> &[TokenId] {
        &self.previous_non_null
    }

    /// The non-null data token a null data token stands in for.
    ///
    /// Non-null data tokens resolve to themselves.
    pub fn null_resolution(&self) -> Option<TokenId> {
        self.null_resolution
    }

    pub fn strand_index(&self) -> Option<usize> {
        self.strand
    }

    // ========================================================================
    // Classification
    // ========================================================================

    pub fn manipulator(&self) -> Option<Manipulator> {
        TokenRecognizer::manipulator(&self.text)
    }

    pub fn is_manipulator(&self) -> bool {
        self.manipulator().is_some()
    }

    pub fn is_exclusive(&self) -> bool {
        TokenRecognizer::is_exclusive(&self.text)
    }

    pub fn is_split(&self) -> bool {
        self.manipulator() == Some(Manipulator::Split)
    }

    pub fn is_merge(&self) -> bool {
        self.manipulator() == Some(Manipulator::Merge)
    }

    pub fn is_exchange(&self) -> bool {
        self.manipulator() == Some(Manipulator::Exchange)
    }

    pub fn is_add(&self) -> bool {
        self.manipulator() == Some(Manipulator::Add)
    }

    pub fn is_terminator(&self) -> bool {
        self.manipulator() == Some(Manipulator::Terminate)
    }

    pub fn is_null(&self) -> bool {
        TokenRecognizer::is_null(&self.text)
    }

    pub fn is_data(&self) -> bool {
        TokenRecognizer::is_data(&self.text)
    }

    pub fn is_null_data(&self) -> bool {
        self.text == "."
    }

    pub fn is_non_null_data(&self) -> bool {
        self.is_data() && !self.is_null()
    }

    pub fn is_interpretation(&self) -> bool {
        TokenRecognizer::is_interpretation(&self.text)
    }

    pub fn is_barline(&self) -> bool {
        TokenRecognizer::is_barline(&self.text)
    }

    pub fn is_comment(&self) -> bool {
        TokenRecognizer::is_comment(&self.text)
    }

    pub fn is_local_comment(&self) -> bool {
        TokenRecognizer::is_local_comment(&self.text)
    }

    pub fn is_global_comment(&self) -> bool {
        TokenRecognizer::is_global_comment(&self.text)
    }

    /// Local comment of the form `!ns1:ns2:key=value`.
    pub fn is_local_parameter(&self) -> bool {
        self.is_local_comment() && is_parameter_body(&self.text[1..])
    }

    // ========================================================================
    // Sub-tokens
    // ========================================================================

    /// Number of separator-delimited parts (chord notes use a space).
    pub fn subtoken_count(&self, separator: &str) -> usize {
        if separator.is_empty() {
            return 1;
        }
        self.text.split(separator).count()
    }

    pub fn subtoken(&self, index: usize, separator: &str) -> Option<&str> {
        if separator.is_empty() {
            return (index == 0).then_some(self.text.as_str());
        }
        self.text.split(separator).nth(index)
    }

    pub fn subtokens(&self, separator: &str) -> Vec<&str> {
        if separator.is_empty() {
            return vec![self.text.as_str()];
        }
        self.text.split(separator).collect()
    }

    // ========================================================================
    // Kern data
    // ========================================================================

    fn is_kern_data(&self) -> bool {
        self.is_kern() && self.is_non_null_data()
    }

    pub fn is_rest(&self) -> bool {
        self.is_kern_data() && kern::is_rest(&self.text)
    }

    pub fn is_note(&self) -> bool {
        self.is_kern_data() && kern::is_note(&self.text)
    }

    pub fn is_secondary_tied_note(&self) -> bool {
        self.is_kern_data() && kern::is_secondary_tied_note(&self.text)
    }

    pub fn is_note_attack(&self) -> bool {
        self.is_kern_data() && kern::is_note_attack(&self.text)
    }

    pub fn has_slur_start(&self) -> bool {
        self.is_kern_data() && kern::has_slur_start(&self.text)
    }

    pub fn has_slur_end(&self) -> bool {
        self.is_kern_data() && kern::has_slur_end(&self.text)
    }

    pub fn slur_start_elision_level(&self) -> Option<usize> {
        self.is_kern_data()
            .then(|| kern::slur_start_elision_level(&self.text))
            .flatten()
    }

    pub fn slur_end_elision_level(&self) -> Option<usize> {
        self.is_kern_data()
            .then(|| kern::slur_end_elision_level(&self.text))
            .flatten()
    }

    pub fn is_grace(&self) -> bool {
        self.is_kern_data() && kern::is_grace(&self.text)
    }

    pub fn is_invisible(&self) -> bool {
        self.is_kern() && (self.is_data() || self.is_barline()) && kern::is_invisible(&self.text)
    }

    pub fn is_clef(&self) -> bool {
        kern::is_clef(&self.text)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
