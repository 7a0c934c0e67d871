//! Track assignment
//!
//! Walks the spined lines top to bottom, keeping the list of active spine
//! positions. Each manipulator line rewrites that list: splits double a
//! position, merge runs collapse, exchange pairs swap, additions open a new
//! track that must be declared with `**type` on the next spined line, and
//! terminators drop their position.

use crate::diagnostics::{HumdrumError, Result};
use crate::models::{Line, TokenId};
use crate::parse::Manipulator;

use super::file::HumdrumFile;

/// One active spine position between two lines
#[derive(Clone, Debug, PartialEq)]
struct ActiveSpine {
    /// Split/merge path label
    info: String,
    data_type: String,
    /// Opened by `*+` (or the file start) and still waiting for `**type`
    pending: bool,
}

impl HumdrumFile {
    pub(crate) fn analyze_spines(&mut self) -> Result<()> {
        let mut active: Vec<ActiveSpine> = Vec::new();
        let mut last_spined = None;

        for index in 0..self.lines.len() {
            if !self.lines[index].has_spines() {
                continue;
            }
            last_spined = Some(index);

            // Nothing open: either the first spined line or a new segment after
            // every spine has terminated.
            if active.is_empty() {
                active = self.open_spines(index)?;
            }

            let line = &self.lines[index];
            if line.token_count() != active.len() {
                return Err(HumdrumError::FieldCountMismatch {
                    line: index + 1,
                    expected: active.len(),
                    found: line.token_count(),
                    text: line.text().to_string(),
                });
            }
            if let Some(field) = line
                .tokens()
                .iter()
                .zip(&active)
                .position(|(token, spine)| spine.pending && !token.is_exclusive())
            {
                return Err(HumdrumError::MissingExclusive {
                    line: index + 1,
                    field: field + 1,
                    text: line.text().to_string(),
                });
            }

            let line = &mut self.lines[index];
            for (token, spine) in line.tokens_mut().iter_mut().zip(&active) {
                token.address.track = track_from_info(&spine.info);
                token.address.spine_info = spine.info.clone();
                token.address.data_type = if token.is_exclusive() {
                    token.text().to_string()
                } else {
                    spine.data_type.clone()
                };
            }

            if self.lines[index].is_manipulator() {
                active = self.adjust_spines(index, &active)?;
            }
        }

        if let Some(field) = active.iter().position(|spine| spine.pending) {
            let line = last_spined.and_then(|index| self.lines.get(index));
            return Err(HumdrumError::MissingExclusive {
                line: line.map_or(0, |line| line.index() + 1),
                field: field + 1,
                text: line.map(Line::text).unwrap_or_default().to_string(),
            });
        }
        Ok(())
    }

    /// Open one new track per field of an exclusive-interpretation line.
    fn open_spines(&mut self, index: usize) -> Result<Vec<ActiveSpine>> {
        let line = &self.lines[index];
        if !line.tokens().iter().all(|token| token.is_exclusive()) {
            return Err(HumdrumError::DataBeforeExclusive {
                line: index + 1,
                text: line.text().to_string(),
            });
        }
        let count = line.token_count();
        Ok((0..count)
            .map(|_| {
                let track = self.new_track();
                ActiveSpine {
                    info: track.to_string(),
                    data_type: String::new(),
                    pending: true,
                }
            })
            .collect())
    }

    /// Register a track and return its 1-based number.
    fn new_track(&mut self) -> usize {
        self.track_starts.push(None);
        self.track_ends.push(Vec::new());
        self.track_starts.len()
    }

    /// Compute the active positions after a manipulator line.
    fn adjust_spines(&mut self, index: usize, active: &[ActiveSpine]) -> Result<Vec<ActiveSpine>> {
        let fields: Vec<(Option<Manipulator>, String, usize)> = self.lines[index]
            .tokens()
            .iter()
            .map(|token| (token.manipulator(), token.text().to_string(), token.track()))
            .collect();
        let line_text = self.lines[index].text().to_string();

        let mut adjusted = Vec::with_capacity(active.len() + 1);
        let mut field = 0;
        while field < fields.len() {
            let spine = &active[field];
            let (manipulator, text, track) = &fields[field];
            match manipulator {
                Some(Manipulator::Split) => {
                    for branch in ["a", "b"] {
                        adjusted.push(ActiveSpine {
                            info: format!("({}){}", spine.info, branch),
                            ..spine.clone()
                        });
                    }
                }
                Some(Manipulator::Merge) => {
                    let run = fields[field..]
                        .iter()
                        .take_while(|(m, _, _)| *m == Some(Manipulator::Merge))
                        .count();
                    let infos: Vec<&str> = active[field..field + run]
                        .iter()
                        .map(|spine| spine.info.as_str())
                        .collect();
                    adjusted.push(ActiveSpine {
                        info: merged_spine_info(&infos),
                        ..spine.clone()
                    });
                    field += run;
                    continue;
                }
                Some(Manipulator::Exchange) => {
                    let paired = matches!(fields.get(field + 1), Some((Some(Manipulator::Exchange), _, _)));
                    if !paired {
                        return Err(HumdrumError::UnpairedExchange {
                            line: index + 1,
                            field: field + 1,
                            text: line_text.clone(),
                        });
                    }
                    adjusted.push(active[field + 1].clone());
                    adjusted.push(spine.clone());
                    field += 2;
                    continue;
                }
                Some(Manipulator::Add) => {
                    adjusted.push(spine.clone());
                    let track = self.new_track();
                    adjusted.push(ActiveSpine {
                        info: track.to_string(),
                        data_type: String::new(),
                        pending: true,
                    });
                }
                Some(Manipulator::Terminate) => {
                    if let Some(ends) = track.checked_sub(1).and_then(|t| self.track_ends.get_mut(t)) {
                        ends.push(TokenId::new(index, field));
                    }
                }
                Some(Manipulator::Exclusive) => {
                    if !spine.pending {
                        return Err(HumdrumError::UnpreparedExclusive {
                            line: index + 1,
                            field: field + 1,
                            text: line_text.clone(),
                        });
                    }
                    if let Some(start) = track.checked_sub(1).and_then(|t| self.track_starts.get_mut(t)) {
                        *start = Some(TokenId::new(index, field));
                    }
                    adjusted.push(ActiveSpine {
                        info: spine.info.clone(),
                        data_type: text.clone(),
                        pending: false,
                    });
                }
                None => adjusted.push(spine.clone()),
            }
            field += 1;
        }
        Ok(adjusted)
    }

    /// Number sub-tracks on every spined line.
    ///
    /// A track with a single token on the line has sub-track 0; otherwise its
    /// tokens are numbered 1, 2, ... from left to right.
    pub(crate) fn analyze_tracks(&mut self) {
        let max_track = self.max_track();
        for line in self.lines.iter_mut().filter(|line| line.has_spines()) {
            let mut counts = vec![0usize; max_track + 1];
            for token in line.tokens() {
                if let Some(count) = counts.get_mut(token.track()) {
                    *count += 1;
                }
            }
            let mut seen = vec![0usize; max_track + 1];
            for token in line.tokens_mut() {
                let track = token.track();
                let count = counts.get(track).copied().unwrap_or(0);
                token.address.subtrack_count = count;
                token.address.subtrack = if count > 1 {
                    seen[track] += 1;
                    seen[track]
                } else {
                    0
                };
            }
        }
    }
}

/// First integer in a spine path; the track number it descends from.
pub(crate) fn track_from_info(info: &str) -> usize {
    info.chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

/// Label of the spine produced by merging `infos`, folded left to right.
///
/// The two halves of a split, `(P)a` and `(P)b`, collapse back to `P`; any
/// other pair is joined with a space.
pub(crate) fn merged_spine_info(infos: &[&str]) -> String {
    let mut iter = infos.iter();
    let Some(first) = iter.next() else {
        return String::new();
    };
    iter.fold(first.to_string(), |merged, info| merge_pair(&merged, info))
}

fn merge_pair(left: &str, right: &str) -> String {
    if let (Some(left_parent), Some(right_parent)) = (left.strip_suffix('a'), right.strip_suffix('b')) {
        if left_parent == right_parent && left_parent.len() >= 2 {
            if let Some(inner) = left_parent
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
            {
                return inner.to_string();
            }
        }
    }
    format!("{} {}", left, right)
}
