//! Per-track token sequences with filtering

use crate::models::TokenId;

use super::file::HumdrumFile;

/// Which lines and tokens to leave out of a track sequence
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TrackFilter {
    /// Only the first token of the track on each line
    pub primary: bool,
    pub no_empty: bool,
    pub no_null: bool,
    pub no_interp: bool,
    pub no_manip: bool,
    pub no_comment: bool,
    pub no_global: bool,
    pub no_rest: bool,
    pub no_tie: bool,
}

impl TrackFilter {
    /// Data, barlines and plain interpretations.
    pub fn data() -> Self {
        Self {
            no_manip: true,
            no_comment: true,
            no_global: true,
            ..Self::default()
        }
    }

    /// Only tokens where a note starts sounding.
    pub fn attacks() -> Self {
        Self {
            no_rest: true,
            no_tie: true,
            no_null: true,
            ..Self::data()
        }
    }
}

impl HumdrumFile {
    /// Tokens of `track`, grouped by line.
    ///
    /// Lines without spines contribute their single token unless filtered out.
    pub fn track_sequence(&self, track: usize, filter: TrackFilter) -> Vec<Vec<TokenId>> {
        let mut sequence = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            if filter.no_empty && line.is_empty() {
                continue;
            }
            if !line.has_spines() {
                if !filter.no_global {
                    sequence.push(vec![TokenId::new(index, 0)]);
                }
                continue;
            }
            if (filter.no_manip && line.is_manipulator())
                || (filter.no_interp && line.is_interpretation())
                || (filter.no_comment && line.is_local_comment())
            {
                continue;
            }

            let mut group = Vec::new();
            for token in line.tokens().iter().filter(|token| token.track() == track) {
                if (filter.no_null && token.is_null())
                    || (filter.no_rest && token.is_rest())
                    || (filter.no_tie && token.is_secondary_tied_note())
                {
                    continue;
                }
                group.push(token.id());
                if filter.primary {
                    break;
                }
            }
            if !group.is_empty() {
                sequence.push(group);
            }
        }
        sequence
    }

    /// First token of each line group in [`track_sequence`](Self::track_sequence).
    pub fn primary_track_sequence(&self, track: usize, filter: TrackFilter) -> Vec<TokenId> {
        let filter = TrackFilter {
            primary: true,
            ..filter
        };
        self.track_sequence(track, filter)
            .into_iter()
            .filter_map(|group| group.first().copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_sequence() {
        let file = HumdrumFile::parse("**kern\t**kern\n[4c\t4r\n4c]\t.\n=1\t=1\n4d\t4e\n*-\t*-\n");
        assert!(file.is_valid());
        let attacks = file.primary_track_sequence(1, TrackFilter::attacks());
        assert_eq!(attacks, vec![TokenId::new(1, 0), TokenId::new(3, 0), TokenId::new(4, 0)]);

        let second = file.primary_track_sequence(2, TrackFilter::attacks());
        assert_eq!(second, vec![TokenId::new(3, 1), TokenId::new(4, 1)]);
    }
}
