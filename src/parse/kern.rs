//! Note-level predicates for `**kern` data
//!
//! Plain substring scans used by higher level semantic passes. Callers are
//! expected to check the token's data type first; see [`crate::models::Token`].

pub fn is_rest(text: &str) -> bool {
    text.contains('r')
}

/// Any pitch letter, upper or lower case.
pub fn is_note(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c.to_ascii_lowercase(), 'a'..='g'))
}

/// Continuation or end of a tie: the note is sounding but not re-struck.
pub fn is_secondary_tied_note(text: &str) -> bool {
    is_note(text) && (text.contains('_') || text.contains(']'))
}

pub fn is_note_attack(text: &str) -> bool {
    is_note(text) && !is_secondary_tied_note(text)
}

pub fn has_slur_start(text: &str) -> bool {
    text.contains('(')
}

pub fn has_slur_end(text: &str) -> bool {
    text.contains(')')
}

/// Number of `&` elision markers directly before the first `(`.
pub fn slur_start_elision_level(text: &str) -> Option<usize> {
    elision_before(text, '(')
}

/// Number of `&` elision markers directly before the first `)`.
pub fn slur_end_elision_level(text: &str) -> Option<usize> {
    elision_before(text, ')')
}

fn elision_before(text: &str, marker: char) -> Option<usize> {
    let index = text.find(marker)?;
    Some(text[..index].chars().rev().take_while(|&c| c == '&').count())
}

pub fn is_grace(text: &str) -> bool {
    text.contains('q')
}

/// `yy` hides a note or rest; `-` hides a barline.
pub fn is_invisible(text: &str) -> bool {
    if text.starts_with('=') {
        text.contains('-')
    } else {
        text.contains("yy")
    }
}

pub fn is_clef(text: &str) -> bool {
    text.starts_with("*clef")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_and_rests() {
        assert!(is_note("4c#"));
        assert!(is_note("8AA"));
        assert!(!is_note("4r"));
        assert!(is_rest("4r"));
        assert!(!is_rest("4c"));
    }

    #[test]
    fn test_ties() {
        assert!(is_secondary_tied_note("4c]"));
        assert!(is_secondary_tied_note("4c_"));
        assert!(!is_secondary_tied_note("[4c"));
        assert!(is_note_attack("[4c"));
        assert!(!is_note_attack("4c]"));
    }

    #[test]
    fn test_slurs() {
        assert!(has_slur_start("(4c"));
        assert!(has_slur_end("4c)"));
        assert_eq!(slur_start_elision_level("(4c"), Some(0));
        assert_eq!(slur_start_elision_level("&&(4c"), Some(2));
        assert_eq!(slur_end_elision_level("4c&)"), Some(1));
        assert_eq!(slur_start_elision_level("4c"), None);
    }

    #[test]
    fn test_misc() {
        assert!(is_grace("8qc"));
        assert!(is_invisible("4cyy"));
        assert!(!is_invisible("4cy"));
        assert!(is_invisible("=-"));
        assert!(is_clef("*clefG2"));
        assert!(!is_clef("*k[]"));
    }
}
