//! Relative reference resolution and normalization

use wu_core::{join_url, normalize_url, ParseError, Url};

const RFC3986_BASE: &str = "http://a/b/c/d;p?q";

#[test]
fn test_rfc3986_normal_and_abnormal_examples() {
    let cases = [
        ("g:h", "g:h"),
        ("g", "http://a/b/c/g"),
        ("./g", "http://a/b/c/g"),
        ("g/", "http://a/b/c/g/"),
        ("/g", "http://a/g"),
        ("//g", "http://g/"),
        ("?y", "http://a/b/c/d;p?y"),
        ("g?y", "http://a/b/c/g?y"),
        ("#s", "http://a/b/c/d;p?q#s"),
        ("g#s", "http://a/b/c/g#s"),
        ("g?y#s", "http://a/b/c/g?y#s"),
        (";x", "http://a/b/c/;x"),
        ("g;x", "http://a/b/c/g;x"),
        ("g;x?y#s", "http://a/b/c/g;x?y#s"),
        ("", "http://a/b/c/d;p?q"),
        (".", "http://a/b/c/"),
        ("./", "http://a/b/c/"),
        ("..", "http://a/b/"),
        ("../", "http://a/b/"),
        ("../g", "http://a/b/g"),
        ("../..", "http://a/"),
        ("../../", "http://a/"),
        ("../../g", "http://a/g"),
        ("/./g", "http://a/g"),
        ("/../g", "http://a/g"),
        ("g.", "http://a/b/c/g."),
        (".g", "http://a/b/c/.g"),
        ("g..", "http://a/b/c/g.."),
        ("..g", "http://a/b/c/..g"),
        ("./../g", "http://a/b/g"),
        ("./g/.", "http://a/b/c/g/"),
        ("g/./h", "http://a/b/c/g/h"),
        ("g/../h", "http://a/b/c/h"),
        ("g;x=1/./y", "http://a/b/c/g;x=1/y"),
        ("g;x=1/../y", "http://a/b/c/y"),
        ("g?y/./x", "http://a/b/c/g?y/./x"),
        ("g?y/../x", "http://a/b/c/g?y/../x"),
        ("g#s/./x", "http://a/b/c/g#s/./x"),
        ("g#s/../x", "http://a/b/c/g#s/../x"),
    ];
    for (input, expected) in cases {
        assert_eq!(join_url(RFC3986_BASE, input).unwrap(), expected, "input {input:?}");
    }
}

#[test]
fn test_join_invalid_base() {
    assert_eq!(join_url("bogus", "./g"), Err(ParseError::InvalidBase));
}

#[test]
fn test_relative_against_opaque_base() {
    assert!(Url::parse_with_base_str("g", "mailto:a@b").is_err());
    assert_eq!(
        Url::parse_with_base_str("#frag", "mailto:a@b").unwrap().href(),
        "mailto:a@b#frag"
    );
}

#[test]
fn test_base_with_relative_path() {
    let url = Url::parse_with_base_str("../example.txt", "https://example.org/path/").unwrap();
    assert_eq!(url.href(), "https://example.org/example.txt");
}

#[test]
fn test_normalize() {
    let cases = [
        ("https://example.org", "https://example.org/"),
        ("https://example.org/../yolo.txt", "https://example.org/yolo.txt"),
        ("https://example.org/dir/../yolo.txt", "https://example.org/yolo.txt"),
        ("https://example.org/dir_1/dir_2/../../yolo.txt", "https://example.org/yolo.txt"),
        ("https://example.org/dir_1/dir_2/../../../yolo.txt", "https://example.org/yolo.txt"),
        ("https://example.org/dir_1/dir_2/../..//yolo.txt", "https://example.org//yolo.txt"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize_url(input).unwrap(), expected, "input {input:?}");
    }
    assert!(normalize_url("bogus").is_err());
}

#[test]
fn test_normalization_is_idempotent() {
    let inputs = [
        "HTTP://EXAMPLE.com:80/a/./b/../c?x#y",
        "https://////example.com/// ",
        "file:///C|/demo",
        "web+demo:/.//not-a-host/",
        "http://[0:0::1]:8080/%7e",
        "https://user:p%40ss@münchen.de/ä?ö#ü",
        "foo://host/%2e%2E/x",
        "mailto:Someone@Example.com ",
        "http://0x7f.1/",
    ];
    for input in inputs {
        let once = normalize_url(input).unwrap();
        let twice = normalize_url(&once).unwrap();
        assert_eq!(once, twice, "input {input:?}");
    }
}
