//! Escaping for Lua string literals.
//!
//! File contents are embedded as long-bracket literals (`[[ ... ]]`), which
//! have no escape sequences at all. Anything the Lua lexer would misread is
//! cut out of the literal and spliced back in as a short quoted string:
//!
//! ```text
//! a]]b   ->   [[a]].."]]"..[[b]]
//! ```
//!
//! Lua parses every `..` one recursion level deeper and gives up after about
//! 200 levels, so a literal takes at most [`MAX_SPLICES`] splices. Text that
//! needs more is spliced in whole as one double-quoted string instead.

use crate::error::{PackError, Result};

const OPEN: &str = "[[";
const CLOSE: &str = "]]";
const CARRIAGE_RETURN: &str = "\r";

/// Tokens that may never appear inside a long-bracket segment. Long literals
/// normalise line endings, so a bare `\r` would not survive either.
const TOKENS: [&str; 3] = [OPEN, CLOSE, CARRIAGE_RETURN];

/// Most splices one long-bracket literal may carry. Each costs two `..`.
pub const MAX_SPLICES: usize = 32;

/// Escape `text` for use between an opening `[[` and a closing `]]`.
///
/// `[[` + result + `]]` evaluates to `text` exactly. Text without tokens is
/// returned unchanged; text needing more than [`MAX_SPLICES`] splices becomes
/// `]]..` + [`lua_quote`]d text + `..[[`.
pub fn escape_long_string(text: &str) -> Result<String> {
    let mut body = LongBody::default();
    let bytes = text.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match TOKENS
            .iter()
            .find(|token| bytes[i..].starts_with(token.as_bytes()))
        {
            Some(token) => {
                // Tokens are ASCII, so `i` is always a char boundary here.
                body.push_segment(&text[start..i])?;
                body.push_fragment(&text[i..i + token.len()])?;
                i += token.len();
                start = i;
                if body.splices > MAX_SPLICES {
                    return Ok(quoted_whole(text));
                }
            }
            None => i += 1,
        }
    }
    body.push_segment(&text[start..])?;
    if body.splices > MAX_SPLICES {
        return Ok(quoted_whole(text));
    }
    Ok(body.out)
}

fn quoted_whole(text: &str) -> String {
    format!("]]..{}..[[", lua_quote(text))
}

#[derive(Default)]
struct LongBody {
    out: String,
    splices: usize,
}

impl LongBody {
    /// Write plain text into the currently open long literal.
    fn push_segment(&mut self, segment: &str) -> Result<()> {
        // The lexer drops a newline directly after an opening bracket.
        if segment.starts_with('\n') {
            self.out.push('\n');
        }
        // A trailing `]` would merge with the closing `]]`.
        match segment.strip_suffix(']') {
            Some(head) => {
                self.out.push_str(head);
                self.push_fragment("]")
            }
            None => {
                self.out.push_str(segment);
                Ok(())
            }
        }
    }

    fn push_fragment(&mut self, token: &str) -> Result<()> {
        push_fragment(&mut self.out, token)?;
        self.splices += 1;
        Ok(())
    }
}

/// Close the open literal, concatenate `token` as a quoted string, reopen.
fn push_fragment(out: &mut String, token: &str) -> Result<()> {
    let quoted = match token {
        OPEN => r#""[[""#,
        CLOSE => r#""]]""#,
        CARRIAGE_RETURN => r#""\r""#,
        "]" => r#""]""#,
        other => {
            return Err(PackError::MalformedEscapeInput {
                token: other.to_string(),
            });
        }
    };
    out.push_str("]]..");
    out.push_str(quoted);
    out.push_str("..[[");
    Ok(())
}

/// Render `s` as a double-quoted Lua string literal.
pub fn lua_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Three digits so a following digit is never absorbed.
            c if c.is_ascii_control() => out.push_str(&format!("\\{:03}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
