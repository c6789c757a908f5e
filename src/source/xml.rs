//! Scanner for renju.net XML database exports.
//!
//! The source format is a single XML document whose `<games>` section holds
//! one `<game>` element per recorded game:
//!
//! ```text
//! <game id="123" opening="d1" tournament="5" rule="1" bresult="1"
//!       black="..." white="...">
//!   <move>h8 i9 g7 ...</move>
//! </game>
//! ```
//!
//! Only the subset above is understood. Attributes may appear in any order;
//! the five standard character entities are decoded. A missing `<games>`
//! section is fatal, while structurally incomplete `<game>` elements are
//! skipped so one truncated record cannot abort a corpus scan.

use thiserror::Error;

/// Errors that make the whole source unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("no <games> section found in source document")]
    MissingGamesSection,
}

/// One `<game>` element as found in the source, before extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGame {
    pub id: String,
    pub opening: Option<String>,
    pub tournament: Option<String>,
    pub rule: Option<String>,
    pub bresult: Option<String>,
    pub black: Option<String>,
    pub white: Option<String>,
    /// Inner text of the `<move>` element, if present.
    pub moves: Option<String>,
}

/// Scans the `<games>` section of a database export into raw game bundles.
pub fn scan_games(xml: &str) -> Result<Vec<RawGame>, SourceError> {
    let start = find_tag_open(xml, "games").ok_or(SourceError::MissingGamesSection)?;
    let section = match xml[start..].find("</games>") {
        Some(end) => &xml[start..start + end],
        None => &xml[start..],
    };

    let mut games = Vec::new();
    let mut rest = section;
    while let Some(pos) = find_tag_open(rest, "game") {
        let after_name = &rest[pos + "<game".len()..];
        let Some((game, consumed)) = parse_game(after_name) else {
            // Truncated element; nothing after it can be a complete game.
            break;
        };
        games.push(game);
        rest = &after_name[consumed..];
    }
    Ok(games)
}

/// Finds the byte offset of `<name` where the name is not a prefix of a
/// longer tag name (so `<game` does not match `<games>`).
fn find_tag_open(text: &str, name: &str) -> Option<usize> {
    let open = format!("<{name}");
    let mut from = 0;
    while let Some(rel) = text[from..].find(&open) {
        let pos = from + rel;
        let tail = &text[pos + open.len()..];
        match tail.bytes().next() {
            Some(b) if b.is_ascii_whitespace() || b == b'>' || b == b'/' => return Some(pos),
            _ => from = pos + open.len(),
        }
    }
    None
}

/// Parses one `<game>` element starting just after the tag name.
///
/// Returns `None` when the element is truncated, otherwise the parsed game
/// and the number of bytes consumed.
fn parse_game(text: &str) -> Option<(RawGame, usize)> {
    let (attrs, tag_len, self_closed) = parse_attributes(text)?;

    let mut game = RawGame::default();
    for (name, value) in attrs {
        match name.as_str() {
            "id" => game.id = value,
            "opening" => game.opening = Some(value),
            "tournament" => game.tournament = Some(value),
            "rule" => game.rule = Some(value),
            "bresult" => game.bresult = Some(value),
            "black" => game.black = Some(value),
            "white" => game.white = Some(value),
            _ => {}
        }
    }

    if self_closed {
        return Some((game, tag_len));
    }

    let body_start = tag_len;
    let Some(body_len) = text[body_start..].find("</game>") else {
        return None;
    };
    let body = &text[body_start..body_start + body_len];
    game.moves = move_text(body);

    let consumed = body_start + body_len + "</game>".len();
    Some((game, consumed))
}

/// Extracts the inner text of a `<move>` element from a game body.
fn move_text(body: &str) -> Option<String> {
    let open = find_tag_open(body, "move")?;
    let after = &body[open..];
    let text_start = open + after.find('>')? + 1;
    // Self-closing <move/> carries no text.
    if body[open..text_start].ends_with("/>") {
        return None;
    }
    let text_len = body[text_start..].find("</move>")?;
    Some(unescape(body[text_start..text_start + text_len].trim()))
}

/// Parses `name="value"` pairs up to the closing `>` of an open tag.
///
/// Returns the pairs, the byte length of the tag including `>`, and whether
/// the tag was self-closing. `None` means the tag never closed.
fn parse_attributes(text: &str) -> Option<(Vec<(String, String)>, usize, bool)> {
    let bytes = text.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => return Some((attrs, i + 1, false)),
            b'/' if bytes.get(i + 1) == Some(&b'>') => return Some((attrs, i + 2, true)),
            _ => {}
        }

        let name_start = i;
        while i < bytes.len() && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let name = text[name_start..i].to_string();
        if *bytes.get(i)? != b'=' {
            // Valueless attribute; not part of the understood subset.
            continue;
        }
        i += 1;

        let quote = *bytes.get(i)?;
        if quote != b'"' && quote != b'\'' {
            return None;
        }
        i += 1;
        let value_start = i;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        attrs.push((name, unescape(&text[value_start..i])));
        i += 1;
    }
}

/// Decodes the five standard XML character entities.
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let replaced = [
            ("&lt;", '<'),
            ("&gt;", '>'),
            ("&amp;", '&'),
            ("&quot;", '"'),
            ("&apos;", '\''),
        ]
        .iter()
        .find(|(entity, _)| rest.starts_with(entity));
        match replaced {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
