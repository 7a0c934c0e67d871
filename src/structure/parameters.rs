//! Layout parameter resolution
//!
//! Local comments shaped like `!ns1:ns2:key=value` attach to the next real
//! token in their spine. Global comments shaped like `!!ns1:ns2:key=value`
//! attach to the next line that carries content.

use crate::models::params::is_parameter_body;
use crate::models::TokenId;

use super::file::HumdrumFile;

impl HumdrumFile {
    pub(crate) fn analyze_global_parameters(&mut self) {
        let mut target: Option<usize> = None;
        for index in (0..self.lines.len()).rev() {
            let line = &self.lines[index];
            if line.has_spines() {
                if !line.is_all_null() && !line.is_manipulator() && !line.is_local_comment() {
                    target = Some(index);
                }
                continue;
            }
            if !line.is_global_comment() || line.is_reference() {
                continue;
            }
            let body = line.text()[2..].to_string();
            if !is_parameter_body(&body) {
                continue;
            }
            match target {
                Some(target) => {
                    self.lines[target]
                        .params
                        .set_parameters(&body, Some(TokenId::new(index, 0)));
                }
                None => log::warn!("line {}: global parameter with no target line", index + 1),
            }
        }
    }

    pub(crate) fn analyze_local_parameters(&mut self) {
        let mut assignments = Vec::new();
        for line in self.lines.iter().filter(|line| line.is_local_comment()) {
            for token in line.tokens().iter().filter(|token| token.is_local_parameter()) {
                match self.parameter_target(token.id()) {
                    Some(target) => assignments.push((target, token.id(), token.text()[1..].to_string())),
                    None => log::warn!(
                        "line {}: local parameter with no target token",
                        token.line_index() + 1
                    ),
                }
            }
        }
        for (target, origin, body) in assignments {
            if let Some(token) = self.token_mut(target) {
                token.params.set_parameters(&body, Some(origin));
            }
        }
    }

    /// Next token along primary links that is not null, a manipulator or a
    /// local comment.
    fn parameter_target(&self, from: TokenId) -> Option<TokenId> {
        let mut current = self.token(from)?.next_token(0)?;
        loop {
            let token = self.token(current)?;
            if !(token.is_null() || token.is_manipulator() || token.is_local_comment()) {
                return Some(current);
            }
            current = token.next_token(0)?;
        }
    }
}
