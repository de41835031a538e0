use crate::BACKSLASH;

/// Scanner on a string.
///
/// Provide convenient APIs to walk through characters one by one.
pub(crate) struct Scanner {
    /// Characters split.
    chars: Vec<char>,

    /// Current position.
    position: usize,
}

impl Scanner {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
        }
    }

    /// Check the scanner process reached the end or not.
    pub(crate) fn done(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Get character at the current position, without advancing.
    pub(crate) fn curr(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    /// Move the position forward and return the character walked through.
    ///
    /// Return `None` if already finished.
    pub(crate) fn next(&mut self) -> Option<char> {
        if self.done() {
            return None;
        }
        let ch = self.chars[self.position];
        self.position += 1;
        Some(ch)
    }

    /// Consume an escape sequence if the scanner stands right after a
    /// backslash and the current character is accepted by `escapable`.
    ///
    /// Return the escaped character.
    pub(crate) fn take_escaped(&mut self, escapable: impl Fn(char) -> bool) -> Option<char> {
        match self.curr() {
            Some(ch) if escapable(ch) => {
                self.position += 1;
                Some(ch)
            }
            _ => None,
        }
    }
}

/// Remove one level of backslash escaping.
///
/// Only characters accepted by `escapable` can be escaped, other backslashes
/// are kept verbatim.
pub(crate) fn unescape(value: &str, escapable: impl Fn(char) -> bool) -> String {
    let mut scanner = Scanner::new(value);
    let mut result = String::with_capacity(value.len());
    while let Some(ch) = scanner.next() {
        if ch == BACKSLASH {
            result.push(scanner.take_escaped(&escapable).unwrap_or(BACKSLASH));
        } else {
            result.push(ch);
        }
    }
    result
}
