//! Token address: where a token sits in the spine layout

use serde::{Deserialize, Serialize};

use super::token::TokenId;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Index of the owning line in the file
    pub(crate) line: usize,
    /// Column of the token on its line
    pub(crate) field: usize,
    /// Spine number from its `**type` declaration, 1-based; 0 on global lines
    pub(crate) track: usize,
    /// Position among the track's active sub-spines on this line; 0 when alone
    pub(crate) subtrack: usize,
    /// Number of the track's sub-spines active on this line
    pub(crate) subtrack_count: usize,
    /// Split/merge history of the spine, e.g. `(1)a` or `2`
    pub(crate) spine_info: String,
    /// Exclusive interpretation of the spine, e.g. `**kern`
    pub(crate) data_type: String,
}

impl Address {
    pub fn new(line: usize, field: usize) -> Self {
        Self {
            line,
            field,
            ..Self::default()
        }
    }

    pub fn id(&self) -> TokenId {
        TokenId::new(self.line, self.field)
    }

    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn field_index(&self) -> usize {
        self.field
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn subtrack(&self) -> usize {
        self.subtrack
    }

    pub fn subtrack_count(&self) -> usize {
        self.subtrack_count
    }

    pub fn spine_info(&self) -> &str {
        &self.spine_info
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    /// `track` or `track.subtrack` when the track is split on this line.
    pub fn track_string(&self) -> String {
        if self.subtrack > 0 {
            format!("{}.{}", self.track, self.subtrack)
        } else {
            self.track.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_string() {
        let mut address = Address::new(3, 1);
        address.track = 2;
        assert_eq!(address.track_string(), "2");
        address.subtrack = 1;
        assert_eq!(address.track_string(), "2.1");
        assert_eq!(address.id(), TokenId::new(3, 1));
    }
}
