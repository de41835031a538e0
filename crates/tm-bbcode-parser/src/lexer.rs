use crate::token::{Token, TokenKind};
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// Regex to match a tag head or tail, including the head argument.
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn init_tag_re() -> Regex {
    Regex::new(
        r#"(?is)\[(?:/(?<tail>[a-z0-9_]+)|(?<head>[a-z0-9_]+)(?<argument>=(?:\\.|[^\\\[\]])*|(?:\s+[A-Za-z0-9_-]+=(?:'(?:\\.|[^\\'])*'|"(?:\\.|[^\\"])*"|(?:\\.|[^\\'"\s\]])*))*))\]"#,
    )
    .expect("invalid tag regex")
}

/// Find tag markers in source text.
pub struct Lexer<'a> {
    /// Text to scan.
    source: &'a str,

    /// Scanned tokens.
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: vec![],
        }
    }

    /// Run the process.
    ///
    /// Markers with a name rejected by `is_known` are dropped and stay in the
    /// document as text. Names are passed in lowercase.
    pub fn scan(mut self, is_known: impl Fn(&str) -> bool) -> Vec<Token> {
        for cap in TAG_RE.get_or_init(init_tag_re).captures_iter(self.source) {
            let Some(whole) = cap.get(0) else {
                continue;
            };

            let (kind, name, argument) = match (cap.name("tail"), cap.name("head")) {
                (Some(tail), _) => (TokenKind::Tail, tail.as_str(), ""),
                (None, Some(head)) => (
                    TokenKind::Head,
                    head.as_str(),
                    cap.name("argument").map_or("", |x| x.as_str()),
                ),
                (None, None) => continue,
            };

            let name = name.to_ascii_lowercase();
            if !is_known(&name) {
                trace!(%name, offset = whole.start(), "skip unknown tag");
                continue;
            }

            self.tokens.push(Token {
                kind,
                name,
                span: whole.range(),
                argument: argument.to_string(),
                content_len: None,
            });
        }

        trace!(count = self.tokens.len(), "scanned tokens");
        self.tokens
    }
}

/// Check `name` can appear in a tag marker, like `b` or `h1` or `my_tag`.
///
/// Case-insensitive, the lexer lowercases names.
pub fn is_tag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Shortcut on [`Lexer::scan`].
pub fn tokenize(source: &str, is_known: impl Fn(&str) -> bool) -> Vec<Token> {
    Lexer::new(source).scan(is_known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn any(_: &str) -> bool {
        true
    }

    fn markers(source: &str) -> Vec<String> {
        tokenize(source, any)
            .iter()
            .map(|x| source[x.span.clone()].to_string())
            .collect()
    }

    #[test]
    fn plain_text_has_no_tokens() {
        assert!(tokenize("hello world", any).is_empty());
    }

    #[test]
    fn head_and_tail() {
        let tokens = tokenize("a[b]c[/b]d", any);
        assert_eq!(
            tokens,
            vec![
                Token {
                    kind: TokenKind::Head,
                    name: "b".to_string(),
                    span: 1..4,
                    argument: String::new(),
                    content_len: None,
                },
                Token {
                    kind: TokenKind::Tail,
                    name: "b".to_string(),
                    span: 5..9,
                    argument: String::new(),
                    content_len: None,
                },
            ]
        );
    }

    #[test]
    fn names_are_lowercased() {
        let tokens = tokenize("[B]x[/b]", any);
        assert_eq!(tokens[0].name, "b");
        assert_eq!(tokens[1].name, "b");
        assert_eq!(tokens[0].span, 0..3);
    }

    #[test]
    fn unknown_names_are_dropped() {
        let tokens = tokenize("[b][x][/x][/b]", |name| name == "b");
        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|x| x.name == "b"));
    }

    #[test]
    fn option_argument() {
        let tokens = tokenize(r"[url=https://a.b/?c=\]]x[/url]", any);
        assert_eq!(tokens[0].argument, r"=https://a.b/?c=\]");
        assert_eq!(tokens[1].name, "url");
    }

    #[test]
    fn attribute_argument_with_brackets_in_quotes() {
        let source = r#"[img alt="[a]" title='b\'c' w=1]"#;
        let tokens = tokenize(source, any);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].argument, r#" alt="[a]" title='b\'c' w=1"#);
        assert_eq!(tokens[0].span, 0..source.len());
    }

    #[test]
    fn invalid_markers_are_text() {
        assert!(markers("[b ][/b x][-a][a.b][]").is_empty());
    }

    #[test]
    fn unclosed_option_bracket() {
        // `[` is not allowed in an option, so the url head never matches.
        assert_eq!(markers("[url=[b]x[/b]"), vec!["[b]", "[/b]"]);
    }

    #[test]
    fn tag_names() {
        for name in ["b", "H1", "my_tag", "0"] {
            assert!(is_tag_name(name), "{name}");
            assert_eq!(markers(&format!("[{name}]")).len(), 1);
        }
        for name in ["", "my-tag", "a.b", "é", "a b"] {
            assert!(!is_tag_name(name), "{name}");
        }
    }

    #[test]
    fn offsets_are_bytes() {
        let tokens = tokenize("é[b]ü[/b]", any);
        assert_eq!(tokens[0].span, 2..5);
        assert_eq!(tokens[1].span, 7..11);
    }
}
