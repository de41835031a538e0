//! Parse the argument of an opening tag.
//!
//! The argument is everything between the tag name and the closing `]`:
//!
//! ```console
//! [url=https://example.com]       option: "https://example.com"
//! [img width=10 alt='a \' b']     attributes: {width: "10", alt: "a ' b"}
//! ```

use crate::scanner::{unescape, Scanner};
use crate::{BACKSLASH, CLOSE, EQUAL, OPEN};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Regex to match one `key=value` assignment in argument.
static ASSIGNMENT_RE: OnceLock<Regex> = OnceLock::new();

/// Parsed tag argument.
///
/// At most one of `option` and `attributes` holds data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagArgument {
    /// Value of the `[name=option]` form.
    pub option: Option<String>,

    /// Named attributes of the `[name key=value]` form.
    pub attributes: HashMap<String, String>,
}

fn init_assignment_re() -> Regex {
    Regex::new(
        r#"(?s)\s(?<key>[A-Za-z0-9_-]+)=(?:'(?<sq>(?:\\.|[^\\'])*)'|"(?<dq>(?:\\.|[^\\"])*)"|(?<uq>(?:\\.|[^\\'"\s\]])*))"#,
    )
    .expect("invalid assignment regex")
}

/// Parse raw tag argument into an option or an attribute map.
///
/// Never fails, fragments not matching the grammar are skipped.
pub fn parse_argument(argument: &str) -> TagArgument {
    if let Some(option) = argument.strip_prefix(EQUAL) {
        return TagArgument {
            option: Some(unescape(option, |c| {
                c == BACKSLASH || c == OPEN || c == CLOSE
            })),
            attributes: HashMap::new(),
        };
    }

    let attributes = ASSIGNMENT_RE
        .get_or_init(init_assignment_re)
        .captures_iter(argument)
        .filter(|cap| {
            // A value must end at whitespace or at the end of argument.
            let end = cap.get(0).map_or(argument.len(), |x| x.end());
            argument[end..].chars().next().map_or(true, char::is_whitespace)
        })
        .map(|cap| {
            let value = if let Some(v) = cap.name("sq") {
                unescape(v.as_str(), |c| c == BACKSLASH || c == '\'')
            } else if let Some(v) = cap.name("dq") {
                unescape(v.as_str(), |c| c == BACKSLASH || c == '"')
            } else {
                let v = cap.name("uq").map_or("", |x| x.as_str());
                unescape(v, |c| {
                    c == BACKSLASH || c == '\'' || c == '"' || c == CLOSE || c.is_whitespace()
                })
            };
            (cap["key"].to_string(), value)
        })
        .collect();

    TagArgument {
        option: None,
        attributes,
    }
}

/// Split `text` on `delimiter`, honoring `\`-escaped delimiters.
///
/// `\\` decodes to a single backslash. Empty input gives no parts.
///
/// ```
/// use tm_bbcode_parser::attr::split_escaped;
///
/// assert_eq!(split_escaped(r"a,b\,c", ','), vec!["a", "b,c"]);
/// ```
pub fn split_escaped(text: &str, delimiter: char) -> Vec<String> {
    if text.is_empty() {
        return vec![];
    }

    let mut scanner = Scanner::new(text);
    let mut parts = vec![];
    let mut current = String::new();
    while let Some(ch) = scanner.next() {
        if ch == BACKSLASH {
            current.push(
                scanner
                    .take_escaped(|c| c == delimiter || c == BACKSLASH)
                    .unwrap_or(BACKSLASH),
            );
        } else if ch == delimiter {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn attrs(argument: &str) -> HashMap<String, String> {
        let parsed = parse_argument(argument);
        assert_eq!(parsed.option, None);
        parsed.attributes
    }

    #[test]
    fn empty_argument() {
        assert_eq!(parse_argument(""), TagArgument::default());
    }

    #[rstest]
    #[case("=red", "red")]
    #[case("=", "")]
    #[case(r"=a\]b", "a]b")]
    #[case(r"=a\[b\\", r"a[b\")]
    #[case(r"=a\nb", r"a\nb")]
    #[case("=x y=z", "x y=z")]
    fn option_value(#[case] argument: &str, #[case] expected: &str) {
        let parsed = parse_argument(argument);
        assert_eq!(parsed.option.as_deref(), Some(expected));
        assert!(parsed.attributes.is_empty());
    }

    #[rstest]
    #[case(r" key='a\'b'", "a'b")]
    #[case(r#" key="a\"b""#, "a\"b")]
    #[case(r#" key='a\"b'"#, r#"a\"b"#)]
    #[case(r" key=a\ b", "a b")]
    #[case(r" key=a\]b", "a]b")]
    #[case(r" key=a\\b", r"a\b")]
    #[case(r" key='a]b'", "a]b")]
    #[case(" key=", "")]
    fn attribute_value(#[case] argument: &str, #[case] expected: &str) {
        assert_eq!(attrs(argument).get("key").map(String::as_str), Some(expected));
    }

    #[test]
    fn multiple_attributes() {
        let parsed = attrs(r#" width=10  alt="a cat" title='x' data-id=a_1"#);
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed["width"], "10");
        assert_eq!(parsed["alt"], "a cat");
        assert_eq!(parsed["title"], "x");
        assert_eq!(parsed["data-id"], "a_1");
    }

    #[test]
    fn keys_are_case_sensitive() {
        let parsed = attrs(" Key=1 key=2");
        assert_eq!(parsed["Key"], "1");
        assert_eq!(parsed["key"], "2");
    }

    #[test]
    fn malformed_fragments_are_skipped() {
        let parsed = attrs(" k.e.y=1 ok=2 =3");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["ok"], "2");
    }

    #[rstest]
    #[case(" a=b'c")]
    #[case(r#" a="b"c"#)]
    #[case(" a='b'c=d")]
    fn value_must_end_at_whitespace(#[case] argument: &str) {
        assert!(attrs(argument).is_empty());
    }

    #[test]
    fn malformed_value_does_not_hide_next_assignment() {
        let parsed = attrs(" a=b'c ok=1");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["ok"], "1");
    }

    #[test]
    fn assignment_needs_leading_whitespace() {
        assert!(attrs("key=1").is_empty());
    }

    #[rstest]
    #[case(r"a,b\,c", vec!["a", "b,c"])]
    #[case("a", vec!["a"])]
    #[case("a,,b", vec!["a", "", "b"])]
    #[case(r"a\\,b", vec![r"a\", "b"])]
    #[case(r"a\b", vec![r"a\b"])]
    #[case("", vec![])]
    fn split_on_unescaped_delimiter(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_escaped(text, ','), expected);
    }
}
