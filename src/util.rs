//! Lenient scanning for the `yyyy-mm-dd` layout the Connect API sends.
//!
//! The scan mirrors a `%04d-%02d-%02d` scanf directive:
//!   - each field reads at most its width (4, 2, 2) of characters;
//!   - leading blanks and one `+`/`-` sign count toward that width;
//!   - a field needs at least one digit, but may be shorter than its width;
//!   - each `-` must be the very next character;
//!   - whatever follows the day field is ignored.
//!
//! So `2024-1-2` scans as 2024-01-02 and `2024-02-29T10:00:00` as 2024-02-29.
//! Upstream payloads rely on this, keep it lenient.

use crate::error::{Field, ParseError};
use std::iter::Peekable;
use std::str::Chars;

/// Scan `input` into `(year, month, day)`.
pub(crate) fn scan_ymd(input: &str) -> Result<(i32, i32, i32), ParseError> {
    let mut scanner = Scanner::new(input);

    let year = scanner.int(4, Field::Year)?;
    scanner.literal('-', Field::Year)?;
    let month = scanner.int(2, Field::Month)?;
    scanner.literal('-', Field::Month)?;
    let day = scanner.int(2, Field::Day)?;

    Ok((year, month, day))
}

/// Unquote a raw JSON string, replacing invalid UTF-8 and unpaired
/// surrogate escapes with U+FFFD.
///
/// Returns `None` for anything that is not a single well-formed JSON string.
pub(crate) fn unquote_lossy(raw: &[u8]) -> Option<String> {
    let raw = trim_json_whitespace(raw);
    let inner = raw.strip_prefix(b"\"")?.strip_suffix(b"\"")?;
    let text = String::from_utf8_lossy(inner);

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return None,
            '\\' => match chars.next()? {
                '"' => out.push('"'),
                '\\' => out.push('\\'),
                '/' => out.push('/'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'u' => {
                    let unit = hex4(&mut chars)?;
                    out.push(decode_unit(unit, &mut chars));
                }
                _ => return None,
            },
            c if u32::from(c) < 0x20 => return None,
            c => out.push(c),
        }
    }

    Some(out)
}

/// Resolve a `\uXXXX` unit, consuming a following low surrogate escape when
/// it completes a pair.
fn decode_unit(unit: u32, chars: &mut Chars<'_>) -> char {
    if (0xD800..0xDC00).contains(&unit) {
        let mut ahead = chars.clone();
        if ahead.next() == Some('\\') && ahead.next() == Some('u') {
            if let Some(low @ 0xDC00..=0xDFFF) = hex4(&mut ahead) {
                *chars = ahead;
                let pair = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                return char::from_u32(pair).unwrap_or(char::REPLACEMENT_CHARACTER);
            }
        }
    }

    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn hex4(chars: &mut Chars<'_>) -> Option<u32> {
    let mut unit = 0;
    for _ in 0..4 {
        unit = unit * 16 + chars.next()?.to_digit(16)?;
    }
    Some(unit)
}

fn trim_json_whitespace(raw: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(*b, b' ' | b'\t' | b'\n' | b'\r');
    let start = raw.iter().position(|b| !is_ws(b)).unwrap_or(raw.len());
    let end = raw.iter().rposition(|b| !is_ws(b)).map_or(start, |i| i + 1);
    &raw[start..end]
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    /// Read a signed decimal integer from at most `width` characters.
    fn int(&mut self, width: usize, field: Field) -> Result<i32, ParseError> {
        let mut budget = width;

        while budget > 0 {
            match self.chars.peek() {
                Some('\n') => return Err(ParseError::Newline(field)),
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                    budget -= 1;
                }
                _ => break,
            }
        }

        if budget == 0 || self.chars.peek().is_none() {
            return Err(ParseError::Missing(field));
        }

        let negative = match self.chars.peek() {
            Some('+') | Some('-') => {
                budget -= 1;
                self.chars.next() == Some('-')
            }
            _ => false,
        };

        let mut value: Option<i32> = None;
        while budget > 0 {
            let Some(digit) = self.chars.peek().and_then(|c| c.to_digit(10)) else {
                break;
            };
            self.chars.next();
            budget -= 1;
            value = Some(value.unwrap_or(0) * 10 + digit as i32);
        }

        let value = value.ok_or(ParseError::NotAnInteger(field))?;
        Ok(if negative { -value } else { value })
    }

    fn literal(&mut self, expected: char, after: Field) -> Result<(), ParseError> {
        match self.chars.next() {
            Some(c) if c == expected => Ok(()),
            _ => Err(ParseError::Separator(after)),
        }
    }
}
