//! Non-null resolution
//!
//! Links always point to later lines, so a single top-to-bottom sweep can
//! carry, for every token, the set of most recent non-null data tokens that
//! reach it. Splits copy the set into each branch and merges union them.

use std::collections::HashMap;

use crate::models::TokenId;

use super::file::HumdrumFile;

/// What the sweep learned about one token
struct Resolution {
    id: TokenId,
    incoming: Vec<TokenId>,
    non_null: bool,
    null_data: bool,
}

impl HumdrumFile {
    pub(crate) fn analyze_non_nulls(&mut self) {
        let mut carried: HashMap<TokenId, Vec<TokenId>> = HashMap::new();

        for index in 0..self.lines.len() {
            if !self.lines[index].has_spines() {
                continue;
            }

            let mut resolutions = Vec::with_capacity(self.lines[index].token_count());
            for token in self.lines[index].tokens() {
                let mut incoming = Vec::new();
                for previous in token.previous_tokens() {
                    match self.token(*previous) {
                        Some(prev) if prev.is_non_null_data() => push_unique(&mut incoming, *previous),
                        _ => {
                            for id in carried.get(previous).into_iter().flatten() {
                                push_unique(&mut incoming, *id);
                            }
                        }
                    }
                }
                resolutions.push(Resolution {
                    id: token.id(),
                    incoming,
                    non_null: token.is_non_null_data(),
                    null_data: token.is_null_data(),
                });
            }

            for resolution in resolutions {
                if resolution.non_null {
                    for previous in &resolution.incoming {
                        if let Some(prev) = self.token_mut(*previous) {
                            push_unique(&mut prev.next_non_null, resolution.id);
                        }
                    }
                }
                if let Some(token) = self.token_mut(resolution.id) {
                    if resolution.non_null {
                        token.null_resolution = Some(resolution.id);
                        token.previous_non_null = resolution.incoming.clone();
                    } else if resolution.null_data {
                        token.null_resolution = resolution.incoming.first().copied();
                    }
                }
                carried.insert(resolution.id, resolution.incoming);
            }
        }
    }
}

fn push_unique(list: &mut Vec<TokenId>, id: TokenId) {
    if !list.contains(&id) {
        list.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_resolution_through_split() {
        let file = HumdrumFile::parse("**kern\n4c\n*^\n.\t4e\n*v\t*v\n.\n*-\n");
        assert!(file.is_valid(), "{}", file.parse_error());

        let note = TokenId::new(1, 0);
        assert_eq!(file.token_at(3, 0).and_then(|t| t.null_resolution()), Some(note));
        assert_eq!(file.token_at(1, 0).and_then(|t| t.null_resolution()), Some(note));

        // Both branches reach the final null; the primary one is listed first.
        let merged = file.token_at(5, 0).and_then(|t| t.null_resolution());
        assert_eq!(merged, Some(note));

        let e = file.token_at(3, 1).map(|t| t.previous_non_null_tokens().to_vec());
        assert_eq!(e, Some(vec![note]));
        let after_c = file.token_at(1, 0).map(|t| t.next_non_null_tokens().to_vec());
        assert_eq!(after_c, Some(vec![TokenId::new(3, 1)]));
    }
}
