// Layout parameters attached from local and global comments

use humdrum_wasm::{AttributeStore, HumdrumFile, ParamKey, TokenId};

fn parse(text: &str) -> HumdrumFile {
    let file = HumdrumFile::parse(text);
    assert!(file.is_valid(), "unexpected error: {}", file.parse_error());
    file
}

#[test]
fn test_local_parameters_skip_manipulators_and_nulls() {
    let file = parse(concat!(
        "**kern\t**kern\n",
        "!LO:N:vis=2:up\t!LO:R:a=1&colon;2\n",
        "*^\t*\n",
        "4c\t4d\t4e\n",
        "*v\t*v\t*\n",
        "*-\t*-\n",
    ));

    let c = file.token_at(3, 0).unwrap().params();
    assert_eq!(c.get("LO:N:vis"), "2");
    assert_eq!(c.get_int("LO:N:vis"), 2);
    assert!(c.get_bool("LO:N:up"));
    assert_eq!(c.origin("LO:N:up"), Some(TokenId::new(1, 0)));
    assert_eq!(c.keys_in("LO", "N"), vec!["up", "vis"]);

    // The split branch never sees a parameter from before the split
    assert!(!file.token_at(3, 1).unwrap().params().has_parameters());

    let e = file.token_at(3, 2).unwrap().params();
    assert_eq!(e.get("LO:R:a"), "1:2");
    assert_eq!(e.origin(("LO", "R", "a")), Some(TokenId::new(1, 1)));

    // The comment tokens themselves keep no parameters
    assert!(!file.token_at(1, 0).unwrap().params().has_parameters());
}

#[test]
fn test_plain_comments_are_not_parameters() {
    let file = parse("**kern\n! just a remark\n!LO:N\n4c\n*-\n");
    assert!(!file.token_at(3, 0).unwrap().params().has_parameters());
    assert!(!file.token_at(1, 0).unwrap().is_local_parameter());
}

#[test]
fn test_global_parameters_target_next_content_line() {
    let file = parse(concat!(
        "!!!OTL: Title\n",
        "**kern\n",
        "!!LO:TX:t=Allegro\n",
        "!!LO:TX:a\n",
        "*\n",
        "!\n",
        "4c\n",
        "!! not a parameter\n",
        "*-\n",
        "!!LO:TX:t=late\n",
    ));
    let line = file.line(6).unwrap();
    assert_eq!(line.params().get("LO:TX:t"), "Allegro");
    assert!(line.params().get_bool("LO:TX:a"));
    assert_eq!(line.params().origin("LO:TX:t"), Some(TokenId::new(2, 0)));
    assert_eq!(line.params().parameter_count(), 2);

    assert!(!file.line(0).unwrap().params().has_parameters());
    assert!(!file.line(8).unwrap().params().has_parameters());
    assert!(!file.line(1).unwrap().params().has_parameters());
}

#[test]
fn test_repeated_keys_keep_the_last_value() {
    let file = parse("**kern\n!LO:N:vis=1\n!LO:N:vis=3\n4c\n*-\n");
    let params = file.token_at(3, 0).unwrap().params();
    assert_eq!(params.get_int("LO:N:vis"), 3);
    assert_eq!(params.origin("LO:N:vis"), Some(TokenId::new(2, 0)));
}

#[test]
fn test_store_round_trips_through_comments() {
    let mut store = AttributeStore::new();
    store.set("LO:N:vis", 2);
    store.set(ParamKey::new("LO", "TX", "t"), "a:b");
    store.set("LO:N:up", "true");

    let comments = store.to_comments("!");
    assert_eq!(comments, vec!["!LO:N:up", "!LO:N:vis=2", "!LO:TX:t=a&colon;b"]);

    let mut parsed = AttributeStore::new();
    for comment in &comments {
        assert!(parsed.set_parameters(&comment[1..], None));
    }
    assert_eq!(parsed, store);
}
