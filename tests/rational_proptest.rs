//! Property-based tests for rational arithmetic and rhythm analysis

use humdrum_wasm::{HumdrumFile, Rational};
use proptest::prelude::*;

/// Finite rationals with small terms
fn rational_strategy() -> impl Strategy<Value = Rational> {
    (-1000i64..1000, 1i64..500).prop_map(|(n, d)| Rational::new(n, d))
}

fn nonzero_rational_strategy() -> impl Strategy<Value = Rational> {
    rational_strategy().prop_filter("non-zero", |r| !r.is_zero())
}

/// Kern note tokens: duration, optional dot, pitch
fn kern_note_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "(1|2|4|8|16)[a-g]",
        "(2|4|8)\\.[a-g]",
        "(3|6|12)[a-g]",
        "(4|8)r",
    ]
}

/// Tokens for a non-rhythmic spine
fn text_token_strategy() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z]{1,6}", Just(".".to_string())]
}

fn melody_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(kern_note_strategy(), 1..20)
}

#[cfg(test)]
mod proptest_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_add_then_subtract(a in rational_strategy(), b in rational_strategy()) {
            prop_assert_eq!((a + b) - b, a);
        }

        #[test]
        fn test_divide_then_multiply(a in rational_strategy(), b in nonzero_rational_strategy()) {
            prop_assert_eq!((a / b) * b, a);
        }

        #[test]
        fn test_display_parses_back(a in rational_strategy()) {
            let parsed = Rational::parse(&a.to_string());
            prop_assert!(parsed.is_exact());
            prop_assert_eq!(*parsed.value(), a);
        }

        #[test]
        fn test_ordering_matches_float(a in rational_strategy(), b in rational_strategy()) {
            prop_assert_eq!(a < b, a.to_float() < b.to_float());
        }

        #[test]
        fn test_lines_rejoin_to_input(
            melody in melody_strategy(),
            lyrics in prop::collection::vec(text_token_strategy(), 20),
        ) {
            let mut text = String::from("**kern\t**text\n");
            for (note, syllable) in melody.iter().zip(&lyrics) {
                text.push_str(&format!("{}\t{}\n", note, syllable));
            }
            text.push_str("*-\t*-\n");

            let file = HumdrumFile::parse(&text);
            prop_assert!(file.is_valid(), "{}", file.parse_error());
            prop_assert_eq!(file.to_string(), text);
        }

        #[test]
        fn test_start_times_accumulate(melody in melody_strategy()) {
            let mut text = String::from("**kern\n");
            for note in &melody {
                text.push_str(note);
                text.push('\n');
            }
            text.push_str("*-\n");

            let file = HumdrumFile::parse(&text);
            prop_assert!(file.is_valid(), "{}", file.parse_error());

            let mut previous = Rational::zero();
            for line in file.lines() {
                prop_assert!(line.duration_from_start() >= previous);
                prop_assert!(!line.duration().is_negative());
                previous = line.duration_from_start();
            }

            let total = file
                .lines()
                .iter()
                .filter_map(|line| line.token(0))
                .filter(|token| token.has_duration())
                .fold(Rational::zero(), |sum, token| sum + token.duration());
            prop_assert_eq!(file.score_duration(), total);
            prop_assert_eq!(file.tpq() % total.denominator(), 0);
        }
    }
}
