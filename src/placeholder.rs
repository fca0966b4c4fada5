//! Positional-placeholder scanning for prepared statements.
//!
//! Counts `?` placeholders in SQL text with a lightweight byte-level state
//! machine that skips quoted strings, line and block comments, and
//! dollar-quoted blocks. The count fixes the parameter arity a prepared
//! statement accepts; the check happens before any network call.

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'-' && bytes.get(idx + 1) == Some(&b'-')
}

fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'/' && bytes.get(idx + 1) == Some(&b'*')
}

fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/')
}

/// Try to open a dollar-quoted block at `idx` (which points at `$`). Returns
/// the tag (without delimiters) and the index of the closing `$` of the
/// opening delimiter.
fn try_start_dollar_quote(bytes: &[u8], idx: usize) -> Option<(String, usize)> {
    let mut end = idx + 1;
    while end < bytes.len() {
        match bytes[end] {
            b'$' => {
                let tag = std::str::from_utf8(&bytes[idx + 1..end]).ok()?;
                return Some((tag.to_string(), end));
            }
            b if b.is_ascii_alphanumeric() || b == b'_' => end += 1,
            _ => return None,
        }
    }
    None
}

/// Whether the closing delimiter `$tag$` starts at `idx` (pointing at `$`).
fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let tag_bytes = tag.as_bytes();
    let end = idx + 1 + tag_bytes.len();
    end < bytes.len() && &bytes[idx + 1..end] == tag_bytes && bytes[end] == b'$'
}

/// Count the positional `?` placeholders in `sql`, ignoring any that appear
/// inside string literals, quoted identifiers, comments, or dollar-quoted
/// blocks.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut state = State::Normal;
    let mut count = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'?' => count += 1,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    let tag_len = tag.len();
                    state = State::Normal;
                    idx += tag_len + 1;
                }
            }
        }
        idx += 1;
    }

    count
}
