//! A whole document: lines plus the spine tables derived from them
//!
//! Reading a file runs the analysis pipeline:
//!
//! 1. tokenize every line
//! 2. assign tracks and spine paths ([`spines`](super::spines))
//! 3. stitch token links between neighbouring lines ([`links`](super::links))
//! 4. number sub-tracks and resolve null tokens ([`nulls`](super::nulls))
//! 5. strands, parameters and timing, unless disabled in [`ParseOptions`]
//!
//! A failing pass stops the pipeline. Its error is kept and the file reports
//! itself invalid, but whatever earlier passes produced stays queryable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::diagnostics::{HumdrumError, Result};
use crate::models::{AttributeStore, Line, ParseOptions, Token, TokenId};
use crate::parse::csv::csv_to_tab;

/// A maximal run of a single sub-spine between layout changes
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strand {
    pub start: TokenId,
    pub end: TokenId,
}

#[derive(Clone, Debug, Default)]
pub struct HumdrumFile {
    pub(crate) lines: Vec<Line>,
    pub(crate) options: ParseOptions,
    /// First token of each track, indexed by track - 1
    pub(crate) track_starts: Vec<Option<TokenId>>,
    /// Terminators of each track, indexed by track - 1
    pub(crate) track_ends: Vec<Vec<TokenId>>,
    pub(crate) strands: Vec<Strand>,
    /// Strand indexes belonging to each spine, in spine order
    pub(crate) spine_strands: Vec<Vec<usize>>,
    /// Line indexes of barlines (line 0 when the music opens with a pickup)
    pub(crate) barlines: Vec<usize>,
    pub(crate) params: AttributeStore,
    errors: Vec<HumdrumError>,
}

impl HumdrumFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tab-separated text with default options.
    pub fn parse(text: &str) -> Self {
        Self::parse_with(text, ParseOptions::default())
    }

    pub fn parse_with(text: &str, options: ParseOptions) -> Self {
        let mut file = Self {
            options,
            ..Self::default()
        };
        for line in text.lines() {
            file.push_line(line);
        }
        file.analyze();
        file
    }

    /// Parse comma-separated (or other `separator`) text.
    pub fn parse_csv(text: &str, separator: &str) -> Self {
        Self::parse_with(text, ParseOptions::csv(separator))
    }

    /// Read and parse a file from disk.
    ///
    /// Only failing to read is an error here; analysis problems are reported
    /// through [`is_valid`](Self::is_valid) and [`parse_error`](Self::parse_error).
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_with(path, ParseOptions::default())
    }

    pub fn read_with(path: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("read {} bytes from {}", text.len(), path.as_ref().display());
        Ok(Self::parse_with(&text, options))
    }

    /// Add a line at the end. Call [`analyze`](Self::analyze) afterwards;
    /// until then the derived structure describes the old content.
    pub fn append(&mut self, text: &str) {
        self.push_line(text);
    }

    fn push_line(&mut self, text: &str) {
        let index = self.lines.len();
        let text = if self.options.csv {
            csv_to_tab(text, &self.options.separator)
        } else {
            text.to_string()
        };
        self.lines.push(Line::new(text, index));
    }

    /// Re-run the whole pipeline from tokenization. Returns [`is_valid`](Self::is_valid).
    pub fn analyze(&mut self) -> bool {
        self.reset();
        let result = self.analyze_base().and_then(|()| {
            if self.options.analyze_structure {
                self.analyze_structure()
            } else {
                Ok(())
            }
        });
        if let Err(err) = result {
            self.record_error(err);
        }
        self.is_valid()
    }

    fn reset(&mut self) {
        for (index, line) in self.lines.iter_mut().enumerate() {
            line.set_index(index);
            line.tokenize();
            line.clear_analysis();
        }
        self.track_starts.clear();
        self.track_ends.clear();
        self.strands.clear();
        self.spine_strands.clear();
        self.barlines.clear();
        self.errors.clear();
    }

    fn analyze_base(&mut self) -> Result<()> {
        self.analyze_spines()?;
        self.analyze_links()?;
        self.analyze_tracks();
        self.analyze_non_nulls();
        log::debug!(
            "spine analysis complete: {} lines, {} tracks",
            self.lines.len(),
            self.max_track()
        );
        Ok(())
    }

    fn analyze_structure(&mut self) -> Result<()> {
        self.analyze_strands();
        self.analyze_global_parameters();
        self.analyze_local_parameters();
        self.analyze_token_durations();
        self.analyze_rhythm()?;
        self.analyze_non_rhythmic_durations();
        log::debug!(
            "structure analysis complete: {} strands, score duration {}",
            self.strands.len(),
            self.score_duration()
        );
        Ok(())
    }

    fn record_error(&mut self, err: HumdrumError) {
        if !self.options.quiet {
            log::error!("{}", err);
        }
        self.errors.push(err);
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[HumdrumError] {
        &self.errors
    }

    /// All recorded errors, one per line; empty when valid.
    pub fn parse_error(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// File-level attributes, for passes that annotate the whole document.
    pub fn params(&self) -> &AttributeStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut AttributeStore {
        &mut self.params
    }

    // ========================================================================
    // Lines and tokens
    // ========================================================================

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut Line> {
        self.lines.get_mut(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.lines.get(id.line)?.token(id.field)
    }

    pub fn token_at(&self, line: usize, field: usize) -> Option<&Token> {
        self.token(TokenId::new(line, field))
    }

    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.lines.get_mut(id.line)?.token_mut(id.field)
    }

    /// Resolve a null data token to the token it repeats.
    pub fn resolve_null(&self, id: TokenId) -> Option<&Token> {
        self.token(id)
            .and_then(Token::null_resolution)
            .and_then(|resolved| self.token(resolved))
    }

    // ========================================================================
    // Tracks and spines
    // ========================================================================

    pub fn max_track(&self) -> usize {
        self.track_starts.len()
    }

    /// First token of a track (1-based).
    pub fn track_start(&self, track: usize) -> Option<TokenId> {
        let index = track.checked_sub(1)?;
        self.track_starts.get(index).copied().flatten()
    }

    pub fn track_end_count(&self, track: usize) -> usize {
        track
            .checked_sub(1)
            .and_then(|index| self.track_ends.get(index))
            .map_or(0, Vec::len)
    }

    /// Terminator of a track; negative indexes count from the last one.
    pub fn track_end(&self, track: usize, index: isize) -> Option<TokenId> {
        let ends = self.track_ends.get(track.checked_sub(1)?)?;
        let index = resolve_index(index, ends.len())?;
        ends.get(index).copied()
    }

    /// Number of spines, i.e. tracks with a start token.
    pub fn spine_count(&self) -> usize {
        self.track_starts.iter().flatten().count()
    }

    /// Start of a spine by 0-based spine index.
    pub fn spine_start(&self, spine: usize) -> Option<TokenId> {
        self.track_starts.get(spine).copied().flatten()
    }

    pub fn spine_start_list(&self) -> Vec<TokenId> {
        self.track_starts.iter().flatten().copied().collect()
    }

    /// Spine starts whose exclusive interpretation is one of `data_types`
    /// (with or without the leading `**`).
    pub fn spine_start_list_of(&self, data_types: &[&str]) -> Vec<TokenId> {
        self.spine_start_list()
            .into_iter()
            .filter(|id| {
                self.token(*id)
                    .map_or(false, |token| data_types.iter().any(|t| token.is_data_type(t)))
            })
            .collect()
    }

    pub fn kern_spine_start_list(&self) -> Vec<TokenId> {
        self.spine_start_list_of(&["**kern"])
    }

    // ========================================================================
    // Strands
    // ========================================================================

    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    pub fn strand_count(&self) -> usize {
        self.strands.len()
    }

    pub fn strand_start(&self, index: usize) -> Option<TokenId> {
        self.strands.get(index).map(|strand| strand.start)
    }

    pub fn strand_end(&self, index: usize) -> Option<TokenId> {
        self.strands.get(index).map(|strand| strand.end)
    }

    pub fn spine_strand_count(&self, spine: usize) -> usize {
        self.spine_strands.get(spine).map_or(0, Vec::len)
    }

    fn spine_strand(&self, spine: usize, index: usize) -> Option<&Strand> {
        let strand = *self.spine_strands.get(spine)?.get(index)?;
        self.strands.get(strand)
    }

    pub fn spine_strand_start(&self, spine: usize, index: usize) -> Option<TokenId> {
        self.spine_strand(spine, index).map(|strand| strand.start)
    }

    pub fn spine_strand_end(&self, spine: usize, index: usize) -> Option<TokenId> {
        self.spine_strand(spine, index).map(|strand| strand.end)
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Rebuild every line's text from its tokens after token edits.
    pub fn rebuild_line_text(&mut self) {
        for line in self.lines.iter_mut().filter(|line| line.has_spines()) {
            line.rebuild_text();
        }
    }
}

impl fmt::Display for HumdrumFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Map a possibly negative index onto `0..len`.
pub(crate) fn resolve_index(index: isize, len: usize) -> Option<usize> {
    if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        let index = index as usize;
        (index < len).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(0, 3), Some(0));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(3, 3), None);
    }

    #[test]
    fn test_display_round_trip() {
        let text = "!!!COM: Anonymous\n**kern\n4c\n*-\n";
        let file = HumdrumFile::parse(text);
        assert!(file.is_valid());
        assert_eq!(file.to_string(), text);
    }

    #[test]
    fn test_append_then_analyze() {
        let mut file = HumdrumFile::new();
        file.append("**kern\t**kern");
        file.append("4c\t4e");
        file.append("*-\t*-");
        assert!(file.analyze());
        assert_eq!(file.max_track(), 2);
        assert_eq!(file.track_end_count(2), 1);
    }

    #[test]
    fn test_errors_are_collected() {
        let file = HumdrumFile::parse("4c\n*-\n");
        assert!(!file.is_valid());
        assert!(file.parse_error().contains("before exclusive interpretation"));
    }
}
