//! Score-level timing queries

use crate::models::Rational;

use super::file::{resolve_index, HumdrumFile};

impl HumdrumFile {
    /// Total length in quarter notes.
    pub fn score_duration(&self) -> Rational {
        match self.lines.last() {
            Some(line) if line.duration_from_start.is_non_negative() => {
                line.duration_from_start + line.duration.max(Rational::zero())
            }
            _ => Rational::zero(),
        }
    }

    /// Time from a line to the end of the score.
    pub fn duration_to_end(&self, line: usize) -> Rational {
        self.lines
            .get(line)
            .map_or(Rational::zero(), |l| self.score_duration() - l.duration_from_start)
    }

    /// Distinct positive line durations in ascending order.
    pub fn positive_line_durations(&self) -> Vec<Rational> {
        let mut durations: Vec<Rational> = self
            .lines
            .iter()
            .map(|line| line.duration)
            .filter(Rational::is_positive)
            .collect();
        durations.sort();
        durations.dedup();
        durations
    }

    /// Ticks per quarter note needed to express every line duration as an
    /// integer, or 0 when that count does not fit in an `i64`.
    pub fn tpq(&self) -> i64 {
        self.positive_line_durations()
            .iter()
            .map(Rational::denominator)
            .try_fold(1, lcm)
            .unwrap_or(0)
    }

    pub fn barline_count(&self) -> usize {
        self.barlines.len()
    }

    /// Line index of a barline; negative indexes count from the end.
    pub fn barline(&self, index: isize) -> Option<usize> {
        let index = resolve_index(index, self.barlines.len())?;
        self.barlines.get(index).copied()
    }

    /// Length of the measure starting at a barline.
    pub fn barline_duration(&self, index: isize) -> Rational {
        let Some(position) = resolve_index(index, self.barlines.len()) else {
            return Rational::zero();
        };
        let start = self.barline_duration_from_start(index);
        match self.barlines.get(position + 1) {
            Some(next) => self.lines[*next].duration_from_start - start,
            None => self.score_duration() - start,
        }
    }

    pub fn barline_duration_from_start(&self, index: isize) -> Rational {
        self.barline(index)
            .map_or(Rational::zero(), |line| self.lines[line].duration_from_start)
    }

    pub fn barline_duration_to_end(&self, index: isize) -> Rational {
        self.barline(index)
            .map_or(Rational::zero(), |line| self.duration_to_end(line))
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: i64, b: i64) -> Option<i64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)?.checked_abs()
}
