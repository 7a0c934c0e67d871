//! Rhythm analysis
//!
//! Durations run down each rhythm-bearing spine from its start. Every line
//! reached gets a start time; two spines disagreeing about a line is fatal.
//! Propagation uses an explicit worklist and remembers the time each token
//! was reached at, so merging branches are checked against each other.
//!
//! Lines no rhythm token starts on are filled in afterwards: null data lines
//! are interpolated between their timed neighbours, the rest copy the next
//! known start time.

use std::collections::HashMap;

use crate::diagnostics::{HumdrumError, Result};
use crate::models::{Rational, TokenId};
use crate::parse::whole_note_fraction;

use super::file::HumdrumFile;

impl HumdrumFile {
    pub(crate) fn analyze_token_durations(&mut self) {
        for line in self.lines.iter_mut().filter(|line| line.has_spines()) {
            for token in line.tokens_mut() {
                token.analyze_duration();
                if token.has_rhythm()
                    && token.is_non_null_data()
                    && !whole_note_fraction(token.text()).is_exact()
                {
                    log::warn!("line {}: no rhythm in {:?}", token.line_index() + 1, token.text());
                }
            }
        }
    }

    pub(crate) fn analyze_rhythm(&mut self) -> Result<()> {
        let Some(first) = self.spine_start(0) else {
            return Ok(());
        };
        let rhythm_starts: Vec<TokenId> = self
            .spine_start_list()
            .into_iter()
            .filter(|id| self.token(*id).map_or(false, |t| t.has_rhythm()))
            .collect();

        let mut arrivals = HashMap::new();
        for start in rhythm_starts.iter().filter(|id| id.line == first.line) {
            self.propagate_durations(*start, Rational::zero(), &mut arrivals)?;
        }

        // Spines opened later (by `*+`, or in a new segment after every spine
        // ended) float until they meet a timed line. Without one ahead they
        // continue from the last timed line before them.
        for start in rhythm_starts.iter().filter(|id| id.line != first.line) {
            let offset = self
                .floating_offset(*start)
                .or_else(|| self.preceding_start(start.line))
                .unwrap_or_else(Rational::zero);
            if offset.is_negative() {
                return Err(HumdrumError::NegativeDuration {
                    line: start.line + 1,
                    text: self.line_text(start.line),
                });
            }
            self.propagate_durations(*start, offset, &mut arrivals)?;
        }

        self.analyze_null_line_rhythms()?;
        self.fill_in_start_times();
        self.assign_line_durations();
        self.analyze_meter();
        Ok(())
    }

    fn propagate_durations(
        &mut self,
        start: TokenId,
        offset: Rational,
        arrivals: &mut HashMap<TokenId, Rational>,
    ) -> Result<()> {
        let mut work = vec![(start, offset)];
        while let Some((id, elapsed)) = work.pop() {
            if !elapsed.is_finite() {
                return Err(HumdrumError::TimingOverflow {
                    line: id.line + 1,
                    text: self.line_text(id.line),
                });
            }
            if let Some(previous) = arrivals.get(&id) {
                if *previous != elapsed {
                    return Err(self.inconsistent(id.line, *previous, elapsed));
                }
                continue;
            }
            arrivals.insert(id, elapsed);

            let Some(token) = self.token(id) else {
                continue;
            };
            let duration = token.duration();
            let next = token.next_tokens().to_vec();
            if token.is_terminator() || !duration.is_negative() {
                self.set_line_start(id.line, elapsed)?;
            }

            let after = if duration.is_positive() {
                elapsed + duration
            } else {
                elapsed
            };
            // Reversed so the primary branch is handled first.
            work.extend(next.into_iter().rev().map(|next| (next, after)));
        }
        Ok(())
    }

    fn set_line_start(&mut self, index: usize, start: Rational) -> Result<()> {
        let current = self.lines[index].duration_from_start;
        if current.is_negative() {
            self.lines[index].duration_from_start = start;
            Ok(())
        } else if current != start {
            Err(self.inconsistent(index, current, start))
        } else {
            Ok(())
        }
    }

    fn inconsistent(&self, index: usize, expected: Rational, found: Rational) -> HumdrumError {
        HumdrumError::InconsistentRhythm {
            line: index + 1,
            expected: expected.to_string(),
            found: found.to_string(),
            text: self.line_text(index),
        }
    }

    fn line_text(&self, index: usize) -> String {
        self.lines
            .get(index)
            .map(|line| line.text().to_string())
            .unwrap_or_default()
    }

    /// Start time of a floating spine, derived from the first timed line it
    /// reaches along primary links.
    fn floating_offset(&self, start: TokenId) -> Option<Rational> {
        let mut elapsed = Rational::zero();
        let mut current = start;
        loop {
            let token = self.token(current)?;
            let line_start = self.lines[current.line].duration_from_start;
            if !line_start.is_negative() {
                return Some(line_start - elapsed);
            }
            if token.duration().is_positive() {
                elapsed += token.duration();
            }
            current = token.next_token(0)?;
        }
    }

    fn preceding_start(&self, index: usize) -> Option<Rational> {
        self.lines[..index]
            .iter()
            .rev()
            .map(|line| line.duration_from_start)
            .find(|start| !start.is_negative())
    }

    /// Interpolate start times of data lines whose rhythm tokens are all null.
    fn analyze_null_line_rhythms(&mut self) -> Result<()> {
        let mut previous: Option<usize> = None;
        let mut nulls: Vec<usize> = Vec::new();

        for index in 0..self.lines.len() {
            let line = &self.lines[index];
            if !line.has_spines() {
                continue;
            }
            if line.is_all_rhythmic_null() {
                if line.is_data() {
                    nulls.push(index);
                }
                continue;
            }
            let start = line.duration_from_start;
            if start.is_negative() {
                if line.is_data() {
                    return Err(HumdrumError::NegativeDuration {
                        line: index + 1,
                        text: line.text().to_string(),
                    });
                }
                continue;
            }
            if let Some(before) = previous {
                if !nulls.is_empty() {
                    let from = self.lines[before].duration_from_start;
                    let step = (start - from) / (nulls.len() as i64 + 1);
                    for (position, null) in nulls.iter().enumerate() {
                        self.lines[*null].duration_from_start = from + step * (position as i64 + 1);
                    }
                }
            }
            nulls.clear();
            previous = Some(index);
        }
        Ok(())
    }

    /// Give every remaining line a start time: copy the next known value
    /// backward, then the last known value (or 0) forward.
    fn fill_in_start_times(&mut self) {
        let mut next_known: Option<Rational> = None;
        for line in self.lines.iter_mut().rev() {
            if line.duration_from_start.is_negative() {
                if let Some(value) = next_known {
                    line.duration_from_start = value;
                }
            } else {
                next_known = Some(line.duration_from_start);
            }
        }

        let mut last_known = Rational::zero();
        for line in self.lines.iter_mut() {
            if line.duration_from_start.is_negative() {
                line.duration_from_start = last_known;
            } else {
                last_known = line.duration_from_start;
            }
        }
    }

    fn assign_line_durations(&mut self) {
        let starts: Vec<Rational> = self.lines.iter().map(|line| line.duration_from_start).collect();
        for (index, line) in self.lines.iter_mut().enumerate() {
            let duration = match starts.get(index + 1) {
                Some(next) => *next - starts[index],
                None => Rational::zero(),
            };
            line.set_duration(duration);
        }
    }

    /// Barline positions and time to and from the surrounding barlines.
    fn analyze_meter(&mut self) {
        self.barlines.clear();
        let mut elapsed = Rational::zero();
        let mut found_barline = false;
        for index in 0..self.lines.len() {
            let line = &mut self.lines[index];
            line.duration_from_barline = elapsed;
            elapsed += line.duration;
            if line.is_barline() {
                found_barline = true;
                self.barlines.push(index);
                elapsed = Rational::zero();
            }
            if line.is_data() && !found_barline {
                // Pickup: music before the first barline measures from the top.
                self.barlines.push(0);
                found_barline = true;
            }
        }

        let mut remaining = Rational::zero();
        for line in self.lines.iter_mut().rev() {
            remaining += line.duration;
            line.duration_to_barline = remaining;
            if line.is_barline() {
                remaining = Rational::zero();
            }
        }
    }

    /// Durations of non-null data in spines without rhythm: the time until
    /// the next non-null data token, or until the spine ends.
    pub(crate) fn analyze_non_rhythmic_durations(&mut self) {
        let mut durations = Vec::new();
        for line in self.lines.iter().filter(|line| line.is_data()) {
            for token in line.tokens() {
                if token.has_rhythm() || !token.is_non_null_data() {
                    continue;
                }
                let until = match token.next_non_null_tokens().first() {
                    Some(next) => Some(next.line),
                    None => self.spine_end_line(token.id()),
                };
                if let Some(until) = until {
                    let duration = self.lines[until].duration_from_start - line.duration_from_start;
                    durations.push((token.id(), duration));
                }
            }
        }
        for (id, duration) in durations {
            if let Some(token) = self.token_mut(id) {
                token.duration = duration;
            }
        }
    }

    fn spine_end_line(&self, from: TokenId) -> Option<usize> {
        let mut current = from;
        while let Some(next) = self.token(current)?.next_token(0) {
            current = next;
        }
        Some(current.line)
    }
}
