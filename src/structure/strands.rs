//! Strand decomposition
//!
//! A strand follows primary links from its start until a terminator or a
//! token whose successor is fed by another token first (a secondary merge
//! contribution). Every secondary branch of a split starts a new strand.

use std::collections::HashSet;

use crate::models::TokenId;

use super::file::{HumdrumFile, Strand};

impl HumdrumFile {
    pub(crate) fn analyze_strands(&mut self) {
        self.strands.clear();
        self.spine_strands.clear();

        for start in self.spine_start_list() {
            let mut found = self.collect_spine_strands(start);
            found.sort_by_key(|strand| strand.start);
            let first = self.strands.len();
            self.spine_strands
                .push((first..first + found.len()).collect());
            self.strands.extend(found);
        }

        for index in 0..self.strands.len() {
            let strand = self.strands[index];
            for id in self.strand_tokens(strand) {
                if let Some(token) = self.token_mut(id) {
                    token.strand = Some(index);
                }
            }
        }
        log::debug!("found {} strands", self.strands.len());
    }

    fn collect_spine_strands(&self, start: TokenId) -> Vec<Strand> {
        let mut found = Vec::new();
        let mut pending = vec![start];
        let mut visited = HashSet::new();

        while let Some(begin) = pending.pop() {
            if !visited.insert(begin) {
                continue;
            }
            let mut current = begin;
            loop {
                let Some(token) = self.token(current) else {
                    break;
                };
                let next = token.next_tokens();
                if token.is_terminator() || next.is_empty() {
                    break;
                }
                pending.extend(next[1..].iter().rev().copied());
                let follow = next[0];
                let primary = self
                    .token(follow)
                    .and_then(|t| t.previous_token(0))
                    == Some(current);
                if !primary {
                    break;
                }
                current = follow;
            }
            found.push(Strand {
                start: begin,
                end: current,
            });
        }
        found
    }

    /// Tokens of a strand from start to end along primary links.
    pub fn strand_tokens(&self, strand: Strand) -> Vec<TokenId> {
        let mut tokens = vec![strand.start];
        let mut current = strand.start;
        while current != strand.end {
            match self.token(current).and_then(|t| t.next_token(0)) {
                Some(next) => {
                    tokens.push(next);
                    current = next;
                }
                None => break,
            }
        }
        tokens
    }
}
