//! Delimited text output

use crate::parse::csv::csv_field;
use crate::structure::HumdrumFile;

/// Write every line with fields joined by `separator`, quoting fields that
/// contain the separator or a quote.
pub fn to_csv(file: &HumdrumFile, separator: &str) -> String {
    let mut output = String::new();
    for line in file.lines() {
        if line.has_spines() {
            let fields: Vec<String> = line
                .tokens()
                .iter()
                .map(|token| csv_field(token.text(), separator))
                .collect();
            output.push_str(&fields.join(separator));
        } else {
            output.push_str(&csv_field(line.text(), separator));
        }
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_round_trip() {
        let text = "!! hello, world\n**kern\t**text\n4c\ta, b\n*-\t*-\n";
        let file = HumdrumFile::parse(text);
        let csv = to_csv(&file, ",");
        assert_eq!(csv, "\"!! hello, world\"\n**kern,**text\n4c,\"a, b\"\n*-,*-\n");

        let reread = HumdrumFile::parse_csv(&csv, ",");
        assert!(reread.is_valid(), "{}", reread.parse_error());
        assert_eq!(reread.to_string(), text);
    }
}
