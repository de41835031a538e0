//! Pair tag heads with tag tails.
//!
//! Pairing runs in a single left-to-right pass with a stack of open heads:
//!
//! * A tail with no open head of the same name is an orphan and is dropped.
//! * Otherwise heads are popped until the innermost head of the same name.
//!   Heads of other names popped on the way never get closed and are dropped.
//!
//! Dropped tokens are not errors, they just stay in the document as text.

use crate::token::Token;
use std::collections::HashMap;
use tracing::debug;

/// Keep only paired tokens and annotate each head with its content length.
///
/// The result is well nested and always has an even length.
pub fn validate(mut tokens: Vec<Token>) -> Vec<Token> {
    let mut verified = vec![false; tokens.len()];
    let mut content_len = vec![None; tokens.len()];

    {
        let mut stack: Vec<usize> = vec![];
        let mut open_count: HashMap<&str, usize> = HashMap::new();

        for (i, token) in tokens.iter().enumerate() {
            if token.is_head() {
                stack.push(i);
                *open_count.entry(token.name.as_str()).or_default() += 1;
                continue;
            }

            if open_count.get(token.name.as_str()).copied().unwrap_or(0) == 0 {
                debug!(name = token.name.as_str(), offset = token.start(), "drop orphan tail");
                continue;
            }

            while let Some(j) = stack.pop() {
                let head = &tokens[j];
                if let Some(count) = open_count.get_mut(head.name.as_str()) {
                    *count -= 1;
                }
                if head.name == token.name {
                    verified[i] = true;
                    verified[j] = true;
                    content_len[j] = Some(token.start() - head.end());
                    break;
                }
                debug!(name = head.name.as_str(), offset = head.start(), "drop unclosed head");
            }
        }
    }

    for (token, len) in tokens.iter_mut().zip(content_len) {
        token.content_len = len;
    }

    tokens
        .into_iter()
        .zip(verified)
        .filter_map(|(token, verified)| verified.then_some(token))
        .collect()
}

/// Drop pairs nested deeper than `max_depth`, top level pairs are at depth 1.
///
/// `tokens` must be the output of [`validate`].
pub fn limit_depth(tokens: Vec<Token>, max_depth: usize) -> Vec<Token> {
    let mut keep = vec![true; tokens.len()];
    let mut stack: Vec<usize> = vec![];

    for (i, token) in tokens.iter().enumerate() {
        if token.is_head() {
            stack.push(i);
            if stack.len() > max_depth {
                keep[i] = false;
            }
        } else if let Some(j) = stack.pop() {
            keep[i] = keep[j];
        }
    }

    let dropped = keep.iter().filter(|x| !**x).count();
    if dropped > 0 {
        debug!(dropped, max_depth, "drop tokens nested too deep");
    }

    tokens
        .into_iter()
        .zip(keep)
        .filter_map(|(token, keep)| keep.then_some(token))
        .collect()
}

/// Drop all tokens inside pairs of tags whose content is plain text, like
/// code blocks. The plain pair itself is kept.
///
/// `tokens` must be the output of [`validate`].
pub fn drop_plain_content(tokens: Vec<Token>, is_plain: impl Fn(&str) -> bool) -> Vec<Token> {
    let mut plain_end = None;
    let mut dropped = 0usize;

    let tokens = tokens
        .into_iter()
        .filter(|token| {
            if let Some(end) = plain_end {
                if token.start() < end {
                    dropped += 1;
                    return false;
                }
                // Tail of the plain pair.
                plain_end = None;
                return true;
            }
            if token.is_head() && is_plain(&token.name) {
                plain_end = token.content_range().map(|x| x.end);
            }
            true
        })
        .collect::<Vec<_>>();

    if dropped > 0 {
        debug!(dropped, "drop tokens inside plain tags");
    }
    tokens
}
