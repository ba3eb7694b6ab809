//! Script and style minifiers backed by the `minifier` crate
//!
//! `minifier` is permissive and happily passes broken input through, so a
//! structural pre-check rejects unbalanced brackets, unterminated strings
//! and unterminated comments first.

use crate::domain::{ScriptMinifier, StyleMinifier};
use crate::error::{BuildError, BuildResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsMinifier;

impl ScriptMinifier for JsMinifier {
    fn minify(&self, path: &str, source: &str) -> BuildResult<String> {
        check_structure(source, Syntax::Script).map_err(|message| BuildError::Minify {
            path: path.to_string(),
            message,
        })?;
        Ok(minifier::js::minify(source).to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CssMinifier;

impl StyleMinifier for CssMinifier {
    fn minify(&self, path: &str, source: &str) -> BuildResult<String> {
        let fail = |message: String| BuildError::Minify {
            path: path.to_string(),
            message,
        };
        check_structure(source, Syntax::Style).map_err(fail)?;
        minifier::css::minify(source)
            .map(|minified| minified.to_string())
            .map_err(|e| fail(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    Script,
    Style,
}

/// Reject input whose brackets, strings or comments do not close.
fn check_structure(source: &str, syntax: Syntax) -> Result<(), String> {
    let chars: Vec<char> = source.chars().collect();
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut line = 1;
    // Last significant token, used to tell a regex literal from division.
    let mut prev = Prev::Start;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\n' => line += 1,
            '/' if chars.get(i + 1) == Some(&'*') => {
                let start = line;
                i += 2;
                loop {
                    match chars.get(i) {
                        None => return Err(format!("unterminated comment starting on line {start}")),
                        Some('*') if chars.get(i + 1) == Some(&'/') => {
                            i += 1;
                            break;
                        }
                        Some('\n') => line += 1,
                        Some(_) => {}
                    }
                    i += 1;
                }
            }
            '/' if syntax == Syntax::Script && chars.get(i + 1) == Some(&'/') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if syntax == Syntax::Script && prev.allows_regex() => {
                i = skip_regex(&chars, i, line)?;
                prev = Prev::Punct('/');
            }
            '"' | '\'' => {
                i = skip_string(&chars, i, c, &mut line)?;
                prev = Prev::Punct(c);
            }
            '`' if syntax == Syntax::Script => {
                i = skip_string(&chars, i, c, &mut line)?;
                prev = Prev::Punct(c);
            }
            '(' | '[' | '{' => {
                stack.push((c, line));
                prev = Prev::Punct(c);
            }
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match stack.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Err(format!(
                            "line {line}: '{c}' closes '{open}' opened on line {open_line}"
                        ))
                    }
                    None => return Err(format!("line {line}: unexpected '{c}'")),
                }
                prev = Prev::Punct(c);
            }
            c if c.is_whitespace() => {}
            c if is_word_char(c) => {
                let start = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                // `x.return` is a property, not the keyword.
                let keyword = prev != Prev::Punct('.') && REGEX_KEYWORDS.contains(&word.as_str());
                prev = Prev::Word { keyword };
                continue;
            }
            other => prev = Prev::Punct(other),
        }
        i += 1;
    }

    match stack.pop() {
        Some((open, open_line)) => Err(format!("'{open}' opened on line {open_line} is never closed")),
        None => Ok(()),
    }
}

/// Keywords after which `/` opens a regular expression
const REGEX_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "case",
    "do",
    "else",
    "in",
    "instanceof",
    "new",
    "void",
    "delete",
    "throw",
    "yield",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Punct(char),
    Word { keyword: bool },
}

impl Prev {
    fn allows_regex(self) -> bool {
        match self {
            Prev::Start => true,
            Prev::Punct(c) => "(,=:[!&|?{};+-*%<>~^".contains(c),
            Prev::Word { keyword } => keyword,
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Returns the index of the closing quote.
fn skip_string(chars: &[char], start: usize, quote: char, line: &mut usize) -> Result<usize, String> {
    let open_line = *line;
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '\n' if quote != '`' => {
                return Err(format!("unterminated string starting on line {open_line}"))
            }
            '\n' => *line += 1,
            c if c == quote => return Ok(i),
            _ => {}
        }
        i += 1;
    }
    Err(format!("unterminated string starting on line {open_line}"))
}

/// Returns the index of the closing slash.
fn skip_regex(chars: &[char], start: usize, line: usize) -> Result<usize, String> {
    let mut i = start + 1;
    let mut in_class = false;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return Ok(i),
            '\n' => return Err(format!("line {line}: unterminated regular expression")),
            _ => {}
        }
        i += 1;
    }
    Err(format!("line {line}: unterminated regular expression"))
}
