//! Line-oriented parser for oracle comparison output.
//!
//! The oracle is asked for one `["nameA", "nameB", "shared value"]` array per
//! line. Its output is untrusted text, so each line is matched against a small
//! grammar (a bracketed list of quoted strings) and nothing is ever evaluated.
//! A line that does not match is reported and skipped; it never stops the
//! remaining lines from being read.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parsed `(personA, personB, sharedValue)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedValue {
  pub person_a: String,
  pub person_b: String,
  pub value:    String,
}

impl SharedValue {
  pub fn new(a: impl Into<String>, b: impl Into<String>, value: impl Into<String>) -> Self {
    Self { person_a: a.into(), person_b: b.into(), value: value.into() }
  }
}

/// Why a single line was rejected.
///
/// Columns are zero-based character positions in the trimmed line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
  #[error("not an array")]
  NotAnArray,

  #[error("unterminated string starting at column {0}")]
  UnterminatedString(usize),

  #[error("bad escape sequence at column {0}")]
  BadEscape(usize),

  #[error("unexpected {found:?} at column {column}")]
  Unexpected { found: char, column: usize },

  #[error("expected 3 elements, found {0}")]
  Arity(usize),

  #[error("empty person name")]
  EmptyName,

  #[error("no shared value")]
  NoSharedValue,

  #[error("person paired with themself")]
  SelfPair,
}

/// A rejected line and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
  /// 1-based line number in the raw response.
  pub line_no: usize,
  pub line:    String,
  pub reason:  LineError,
}

/// Everything recovered from one oracle response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
  pub triples: Vec<SharedValue>,
  pub skipped: Vec<SkippedLine>,
}

/// Parse a raw oracle response.
///
/// Blank lines and markdown code fences are ignored without being reported.
pub fn parse_response(raw: &str) -> ParsedResponse {
  let mut out = ParsedResponse::default();

  for (idx, line) in raw.lines().enumerate() {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("```") {
      continue;
    }
    match parse_line(trimmed) {
      Ok(triple) => out.triples.push(triple),
      Err(reason) => out.skipped.push(SkippedLine {
        line_no: idx + 1,
        line: trimmed.to_owned(),
        reason,
      }),
    }
  }

  out
}

/// Parse one line into a triple.
pub fn parse_line(line: &str) -> Result<SharedValue, LineError> {
  let line = line.trim();
  // Models like to emit the arrays as items of a list.
  let line = line.strip_suffix(',').map(str::trim_end).unwrap_or(line);

  if !line.starts_with('[') {
    return Err(LineError::NotAnArray);
  }

  let elems = parse_string_array(line)?;
  let [a, b, value]: [String; 3] = elems
    .try_into()
    .map_err(|v: Vec<String>| LineError::Arity(v.len()))?;

  let (a, b, value) = (a.trim(), b.trim(), value.trim());
  if a.is_empty() || b.is_empty() {
    return Err(LineError::EmptyName);
  }
  if value.is_empty() || value.eq_ignore_ascii_case("none") {
    return Err(LineError::NoSharedValue);
  }
  if a == b {
    return Err(LineError::SelfPair);
  }

  Ok(SharedValue::new(a, b, value))
}

// ─── Grammar ─────────────────────────────────────────────────────────────────
//
//   array  := '[' ws ( string ws ( ',' ws string ws )* )? ']' ws EOF
//   string := '"' chars '"' | '\'' chars '\''

/// Yields `(column, char)`, where the column counts characters, not bytes.
struct Cursor<'a> {
  chars: std::iter::Peekable<std::iter::Enumerate<std::str::Chars<'a>>>,
}

impl<'a> Cursor<'a> {
  fn new(s: &'a str) -> Self { Self { chars: s.chars().enumerate().peekable() } }

  fn skip_ws(&mut self) {
    while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
  }

  fn peek(&mut self) -> Option<(usize, char)> { self.chars.peek().copied() }

  fn next(&mut self) -> Option<(usize, char)> { self.chars.next() }

  fn expect(&mut self, want: char) -> Result<(), LineError> {
    match self.next() {
      Some((_, c)) if c == want => Ok(()),
      Some((column, found)) => Err(LineError::Unexpected { found, column }),
      None => Err(LineError::NotAnArray),
    }
  }

  fn string(&mut self) -> Result<String, LineError> {
    let (start, quote) = match self.next() {
      Some((i, c @ ('"' | '\''))) => (i, c),
      Some((column, found)) => return Err(LineError::Unexpected { found, column }),
      None => return Err(LineError::NotAnArray),
    };

    let mut out = String::new();
    loop {
      match self.next() {
        None => return Err(LineError::UnterminatedString(start)),
        Some((_, c)) if c == quote => return Ok(out),
        Some((at, '\\')) => out.push(self.escape(at)?),
        Some((_, c)) => out.push(c),
      }
    }
  }

  fn escape(&mut self, at: usize) -> Result<char, LineError> {
    let (_, c) = self.next().ok_or(LineError::UnterminatedString(at))?;
    Ok(match c {
      '"' | '\'' | '\\' | '/' => c,
      'n' => '\n',
      't' => '\t',
      'r' => '\r',
      'u' => {
        let mut code = 0u32;
        for _ in 0..4 {
          let (_, h) = self.next().ok_or(LineError::BadEscape(at))?;
          code = code * 16 + h.to_digit(16).ok_or(LineError::BadEscape(at))?;
        }
        char::from_u32(code).ok_or(LineError::BadEscape(at))?
      }
      _ => return Err(LineError::BadEscape(at)),
    })
  }
}

fn parse_string_array(line: &str) -> Result<Vec<String>, LineError> {
  let mut cur = Cursor::new(line);
  let mut elems = Vec::new();

  cur.expect('[')?;
  cur.skip_ws();

  if matches!(cur.peek(), Some((_, ']'))) {
    cur.next();
  } else {
    loop {
      elems.push(cur.string()?);
      cur.skip_ws();
      match cur.next() {
        Some((_, ',')) => cur.skip_ws(),
        Some((_, ']')) => break,
        Some((column, found)) => return Err(LineError::Unexpected { found, column }),
        None => return Err(LineError::NotAnArray),
      }
    }
  }

  cur.skip_ws();
  match cur.next() {
    None => Ok(elems),
    Some((column, found)) => Err(LineError::Unexpected { found, column }),
  }
}
