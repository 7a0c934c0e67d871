//! Reader configuration

use serde::{Deserialize, Serialize};

/// Options controlling how text is read and how far analysis goes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Input lines are CSV rather than tab-separated
    pub csv: bool,
    /// Field separator for CSV input and output
    pub separator: String,
    /// Run strand, rhythm and parameter analysis after the spine passes
    pub analyze_structure: bool,
    /// Do not log fatal analysis errors
    pub quiet: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            csv: false,
            separator: ",".to_string(),
            analyze_structure: true,
            quiet: false,
        }
    }
}

impl ParseOptions {
    pub fn csv(separator: &str) -> Self {
        Self {
            csv: true,
            separator: separator.to_string(),
            ..Self::default()
        }
    }

    /// Spine structure only; no timing or parameters.
    pub fn structure_only() -> Self {
        Self {
            analyze_structure: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"quiet": true}"#).unwrap();
        assert!(options.quiet);
        assert!(options.analyze_structure);
        assert_eq!(options.separator, ",");
    }
}
