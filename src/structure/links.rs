//! Link stitching between consecutive spined lines
//!
//! After a plain line every field links straight down. After a manipulator
//! line the fields are consumed in lock-step following the same rules used
//! for track assignment, and both lines must be used up exactly.

use crate::diagnostics::{HumdrumError, Result};
use crate::models::{Line, TokenId};
use crate::parse::Manipulator;

use super::file::HumdrumFile;

impl HumdrumFile {
    pub(crate) fn analyze_links(&mut self) -> Result<()> {
        let mut previous: Option<usize> = None;
        for index in 0..self.lines.len() {
            if !self.lines[index].has_spines() {
                continue;
            }
            if let Some(prev) = previous {
                let pairs = plan_links(&self.lines[prev], &self.lines[index])?;
                for (from, to) in pairs {
                    self.link(TokenId::new(prev, from), TokenId::new(index, to));
                }
            }
            previous = Some(index);
        }
        Ok(())
    }

    fn link(&mut self, from: TokenId, to: TokenId) {
        if let Some(token) = self.token_mut(from) {
            token.next.push(to);
        }
        if let Some(token) = self.token_mut(to) {
            token.previous.push(from);
        }
    }
}

/// Field pairs `(previous, next)` to link between two spined lines.
fn plan_links(previous: &Line, next: &Line) -> Result<Vec<(usize, usize)>> {
    let alignment_error = || HumdrumError::LinkAlignment {
        line: previous.index() + 1,
        next_line: next.index() + 1,
        text: previous.text().to_string(),
    };

    // Every spine ended; the next line opens a new segment.
    if previous.is_terminator() {
        return Ok(Vec::new());
    }

    if !previous.is_manipulator() {
        if previous.token_count() != next.token_count() {
            return Err(HumdrumError::FieldCountMismatch {
                line: next.index() + 1,
                expected: previous.token_count(),
                found: next.token_count(),
                text: next.text().to_string(),
            });
        }
        return Ok((0..previous.token_count()).map(|i| (i, i)).collect());
    }

    let tokens = previous.tokens();
    let available = next.token_count();
    let mut pairs = Vec::with_capacity(available);
    let (mut from, mut to) = (0, 0);

    while from < tokens.len() {
        let consumed = match tokens[from].manipulator() {
            Some(Manipulator::Split) => {
                if to + 2 > available {
                    return Err(alignment_error());
                }
                pairs.push((from, to));
                pairs.push((from, to + 1));
                from += 1;
                2
            }
            Some(Manipulator::Merge) => {
                let run = tokens[from..].iter().take_while(|t| t.is_merge()).count();
                if to + 1 > available {
                    return Err(alignment_error());
                }
                pairs.extend((from..from + run).map(|f| (f, to)));
                from += run;
                1
            }
            Some(Manipulator::Exchange) => {
                let paired = tokens.get(from + 1).map_or(false, |t| t.is_exchange());
                if !paired || to + 2 > available {
                    return Err(alignment_error());
                }
                pairs.push((from, to + 1));
                pairs.push((from + 1, to));
                from += 2;
                2
            }
            Some(Manipulator::Add) => {
                let declared = next.token(to + 1).map_or(false, |t| t.is_exclusive());
                if !declared {
                    return Err(alignment_error());
                }
                pairs.push((from, to));
                from += 1;
                2
            }
            Some(Manipulator::Terminate) => {
                from += 1;
                0
            }
            Some(Manipulator::Exclusive) | None => {
                if to + 1 > available {
                    return Err(alignment_error());
                }
                pairs.push((from, to));
                from += 1;
                1
            }
        };
        to += consumed;
    }

    if to != available {
        return Err(alignment_error());
    }
    Ok(pairs)
}
