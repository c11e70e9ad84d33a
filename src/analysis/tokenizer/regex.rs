//! Regex-based word tokenizer.
//!
//! Tokens are the maximal, non-overlapping matches of the configured pattern,
//! scanned left to right. When the pattern holds exactly one capture group,
//! the group's text becomes the token instead of the whole match.
//!
//! A word character is a letter (`\p{L}`), a number of any kind (`\p{N}`) or
//! an underscore. Combining marks and connector punctuation other than `_`
//! are not word characters. The regex engine's own `\w` and `\b` disagree
//! with this on those code points, so `\w` and `\W` are rewritten to the
//! class before compiling, and `\b` / `\B` at either end of a pattern are
//! checked by the tokenizer itself.

use std::borrow::Cow;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{LinferError, Result};

/// The word-token pattern: runs of two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Other spellings of the default pattern. The doubled-backslash forms are
/// written by exporters that JSON-encode an already-escaped raw string.
const DEFAULT_PATTERN_SPELLINGS: &[&str] = &[
    r"\b\w\w+\b",
    r"(?u)\\b\\w\\w+\\b",
    r"\\b\\w\\w+\\b",
];

/// Word characters.
const WORD_CLASS: &str = r"[\p{L}\p{N}_]";

/// Everything but word characters.
const NON_WORD_CLASS: &str = r"[^\p{L}\p{N}_]";

lazy_static! {
    // Greedy runs always end at a non-word character or the end of the
    // text, so the default pattern needs no boundary checks.
    static ref DEFAULT_TOKEN_REGEX: Regex =
        Regex::new(r"[\p{L}\p{N}_]{2,}").expect("Default token pattern should be valid");
    static ref WORD_CHAR_REGEX: Regex =
        Regex::new(r"\A[\p{L}\p{N}_]\z").expect("Word class should be valid");
}

/// Whether `c` is a word character.
pub fn is_word_char(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric() || c == '_'
    } else {
        let mut buf = [0; 4];
        WORD_CHAR_REGEX.is_match(c.encode_utf8(&mut buf))
    }
}

/// A word-boundary assertion at the start or end of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Boundary {
    /// `\b`: word on exactly one side.
    Word,
    /// `\B`: word on both sides or on neither.
    NotWord,
}

impl Boundary {
    fn holds(self, text: &str, at: usize) -> bool {
        let before = text[..at].chars().next_back().is_some_and(is_word_char);
        let after = text[at..].chars().next().is_some_and(is_word_char);
        match self {
            Boundary::Word => before != after,
            Boundary::NotWord => before == after,
        }
    }
}

/// A pattern rewritten for the regex engine.
#[derive(Debug, PartialEq)]
struct Translated {
    source: String,
    leading: Option<Boundary>,
    trailing: Option<Boundary>,
}

/// A tokenizer that extracts tokens using a regular expression.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The pattern as configured
    source: String,
    /// The compiled (rewritten) pattern
    regex: Arc<Regex>,
    /// Capture group whose text is emitted, if the pattern has one
    group: Option<usize>,
    /// Boundary required where a match starts
    leading: Option<Boundary>,
    /// Boundary required where a match ends
    trailing: Option<Boundary>,
}

impl RegexTokenizer {
    /// Create a tokenizer with the default two-or-more word characters pattern.
    pub fn new() -> Self {
        RegexTokenizer {
            source: DEFAULT_TOKEN_PATTERN.to_string(),
            regex: Arc::new(DEFAULT_TOKEN_REGEX.clone()),
            group: None,
            leading: None,
            trailing: None,
        }
    }

    /// Create a tokenizer with a custom pattern.
    ///
    /// Rejected as unsupported configuration: patterns the regex engine
    /// cannot compile (look-around, backreferences), patterns with more than
    /// one capture group, and `\b` / `\B` anywhere but at the very start or
    /// end of a pattern without top-level alternation.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        if DEFAULT_PATTERN_SPELLINGS.contains(&pattern) || pattern == DEFAULT_TOKEN_PATTERN {
            return Ok(Self::new());
        }

        let translated = translate(pattern)?;
        let regex = Regex::new(&translated.source).map_err(|e| {
            LinferError::config_unsupported(format!("token pattern {pattern:?}: {e}"))
        })?;

        let group = match regex.captures_len() {
            1 => None,
            2 => Some(1),
            n => {
                return Err(LinferError::config_unsupported(format!(
                    "token pattern {pattern:?} has {} capture groups, at most one is allowed",
                    n - 1
                )));
            }
        };

        Ok(RegexTokenizer {
            source: pattern.to_string(),
            regex: Arc::new(regex),
            group,
            leading: translated.leading,
            trailing: translated.trailing,
        })
    }

    /// Get the pattern this tokenizer was configured with.
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

impl Default for RegexTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize<'a>(&'a self, text: Cow<'a, str>) -> TokenStream<'a> {
        Box::new(RegexTokenStream {
            tokenizer: self,
            text,
            cursor: 0,
            position: 0,
        })
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

/// Rewrite `\w` / `\W` to the word class and lift boundary assertions off
/// both ends of the pattern.
fn translate(pattern: &str) -> Result<Translated> {
    let unsupported = |what: &str| {
        LinferError::config_unsupported(format!("token pattern {pattern:?}: {what}"))
    };

    // Leading inline flag groups such as `(?u)` or `(?i)`.
    let mut prefix_len = 0;
    while let Some(rest) = pattern[prefix_len..].strip_prefix("(?") {
        match rest.find(')') {
            Some(close) if rest[..close].chars().all(|c| c.is_ascii_alphabetic() || c == '-') => {
                prefix_len += close + 3;
            }
            _ => break,
        }
    }
    let (prefix, mut body) = pattern.split_at(prefix_len);

    let leading = boundary_at(body.get(..2));
    if leading.is_some() {
        body = &body[2..];
    }
    let trailing = match body.len().checked_sub(2) {
        Some(at) if body.is_char_boundary(at) && ends_with_escape(body) => {
            boundary_at(body.get(at..))
        }
        _ => None,
    };
    if trailing.is_some() {
        body = &body[..body.len() - 2];
    }

    let mut source = String::with_capacity(pattern.len() + 16);
    source.push_str(prefix);

    let mut depth = 0usize;
    let mut class_depth = 0usize;
    let mut top_level_alternation = false;
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('w') => source.push_str(WORD_CLASS),
                Some('W') => source.push_str(NON_WORD_CLASS),
                Some('b') | Some('B') => {
                    return Err(unsupported(
                        "word boundaries are only supported at the start or end",
                    ));
                }
                Some(other) => {
                    source.push('\\');
                    source.push(other);
                }
                None => source.push('\\'),
            },
            '[' => {
                class_depth += 1;
                source.push('[');
                if chars.peek() == Some(&'^') {
                    source.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    source.push(']');
                    chars.next();
                }
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                source.push(']');
            }
            '(' if class_depth == 0 => {
                depth += 1;
                source.push('(');
            }
            ')' if class_depth == 0 => {
                depth = depth.saturating_sub(1);
                source.push(')');
            }
            '|' if class_depth == 0 && depth == 0 => {
                top_level_alternation = true;
                source.push('|');
            }
            other => source.push(other),
        }
    }

    if top_level_alternation && (leading.is_some() || trailing.is_some()) {
        return Err(unsupported(
            "word boundaries cannot be combined with top-level alternation",
        ));
    }

    Ok(Translated {
        source,
        leading,
        trailing,
    })
}

fn boundary_at(escape: Option<&str>) -> Option<Boundary> {
    match escape {
        Some(r"\b") => Some(Boundary::Word),
        Some(r"\B") => Some(Boundary::NotWord),
        _ => None,
    }
}

/// Whether the last two bytes are an escape sequence rather than an escaped
/// backslash followed by a letter.
fn ends_with_escape(body: &str) -> bool {
    let bytes = body.as_bytes();
    let backslashes = bytes[..bytes.len() - 1]
        .iter()
        .rev()
        .take_while(|&&b| b == b'\\')
        .count();
    backslashes % 2 == 1
}

/// Lazily walks the text one match at a time.
struct RegexTokenStream<'a> {
    tokenizer: &'a RegexTokenizer,
    text: Cow<'a, str>,
    cursor: usize,
    position: usize,
}

impl RegexTokenStream<'_> {
    /// The byte position one character after `at`.
    fn step(&self, at: usize) -> usize {
        at + self.text[at..].chars().next().map_or(1, char::len_utf8)
    }

    /// Where the next search starts; empty matches step over one character.
    fn next_cursor(&self, (start, end): (usize, usize)) -> usize {
        if start == end { self.step(end) } else { end }
    }

    fn boundaries_hold(&self, (start, end): (usize, usize)) -> bool {
        self.tokenizer
            .leading
            .is_none_or(|b| b.holds(&self.text, start))
            && self
                .tokenizer
                .trailing
                .is_none_or(|b| b.holds(&self.text, end))
    }
}

impl Iterator for RegexTokenStream<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let regex = &self.tokenizer.regex;
        while self.cursor <= self.text.len() {
            let (whole, span) = match self.tokenizer.group {
                None => {
                    let m = regex.find_at(&self.text, self.cursor)?;
                    ((m.start(), m.end()), Some((m.start(), m.end())))
                }
                Some(group) => {
                    let caps = regex.captures_at(&self.text, self.cursor)?;
                    let m = caps.get(0)?;
                    (
                        (m.start(), m.end()),
                        caps.get(group).map(|g| (g.start(), g.end())),
                    )
                }
            };

            // A match failing a boundary is retried one character later.
            if !self.boundaries_hold(whole) {
                self.cursor = self.step(whole.0);
                continue;
            }
            self.cursor = self.next_cursor(whole);

            match span {
                Some((start, end)) if start < end => {
                    let token =
                        Token::with_offsets(&self.text[start..end], self.position, start, end);
                    self.position += 1;
                    return Some(token);
                }
                _ => continue,
            }
        }
        None
    }
}
