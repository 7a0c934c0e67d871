//! Comma-separated line conversion
//!
//! Quoted fields may contain the separator; a doubled quote inside quotes is a
//! literal quote. Global comment lines are taken verbatim.

/// Convert one CSV line into tab-separated form.
pub fn csv_to_tab(line: &str, separator: &str) -> String {
    if line.starts_with("!!") || separator.is_empty() {
        return line.to_string();
    }

    let mut output = String::with_capacity(line.len());
    let mut in_quote = false;
    let mut index = 0;
    while index < line.len() {
        let rest = &line[index..];
        let Some(ch) = rest.chars().next() else {
            break;
        };
        if ch == '"' {
            if in_quote && rest[1..].starts_with('"') {
                output.push('"');
                index += 2;
                continue;
            }
            in_quote = !in_quote;
            index += 1;
            continue;
        }
        if !in_quote && rest.starts_with(separator) {
            output.push('\t');
            index += separator.len();
            continue;
        }
        output.push(ch);
        index += ch.len_utf8();
    }
    output
}

/// Quote a field if it would otherwise be split or unquoted on reading.
pub fn csv_field(text: &str, separator: &str) -> String {
    if (!separator.is_empty() && text.contains(separator)) || text.contains('"') {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(csv_to_tab("**kern,**kern", ","), "**kern\t**kern");
        assert_eq!(csv_to_tab("4c,.", ","), "4c\t.");
    }

    #[test]
    fn test_quoted_fields() {
        assert_eq!(csv_to_tab("\"4c,4e\",.", ","), "4c,4e\t.");
        assert_eq!(csv_to_tab("\"say \"\"hi\"\"\",x", ","), "say \"hi\"\tx");
    }

    #[test]
    fn test_global_verbatim() {
        assert_eq!(csv_to_tab("!! a, b", ","), "!! a, b");
    }

    #[test]
    fn test_multichar_separator() {
        assert_eq!(csv_to_tab("a;;b", ";;"), "a\tb");
    }

    #[test]
    fn test_field_quoting() {
        assert_eq!(csv_field("4c", ","), "4c");
        assert_eq!(csv_field("a,b", ","), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\"", ","), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_to_tab(&csv_field("a,\"b\"", ","), ","), "a,\"b\"");
    }
}
