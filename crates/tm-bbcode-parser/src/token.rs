use std::fmt;
use std::ops::Range;

/// Kinds of tag markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Tag head.
    ///
    /// `[$name]`, `[$name=$option]` or `[$name $key=$value ...]`
    Head,

    /// Tag tail.
    ///
    /// `[/$name]`
    Tail,
}

/// A tag marker found in source.
///
/// Plain text is not tokenized, it is whatever lies between tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,

    /// Tag name in lowercase.
    pub name: String,

    /// Byte range of the whole marker in source, brackets included.
    pub span: Range<usize>,

    /// Raw argument between name and `]`, empty on tails.
    pub argument: String,

    /// Bytes between a head and its paired tail.
    ///
    /// Only set by the validator, on heads.
    pub content_len: Option<usize>,
}

impl Token {
    pub fn is_head(&self) -> bool {
        self.kind == TokenKind::Head
    }

    pub fn is_tail(&self) -> bool {
        self.kind == TokenKind::Tail
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// Byte range of the content enclosed by a paired head.
    pub fn content_range(&self) -> Option<Range<usize>> {
        self.content_len.map(|len| self.end()..self.end() + len)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Head => write!(f, "[{}{}]", self.name, self.argument)?,
            TokenKind::Tail => write!(f, "[/{}]", self.name)?,
        }
        write!(f, " @{}..{}", self.span.start, self.span.end)?;
        if let Some(len) = self.content_len {
            write!(f, " content={len}")?;
        }
        Ok(())
    }
}
