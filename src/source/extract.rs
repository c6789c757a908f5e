//! Raw game extraction.
//!
//! Turns a scanned `RawGame` into a validated `GameRecord`. Extraction is a
//! pure parse: any malformed field yields a `ParseError` and the caller
//! decides whether to skip the game (the pipeline does, counting skips).
//!
//! Move tokens are `<column letter><1-based row>`: columns `a..o` map to
//! x = 0..14 and rows `1..15` to y = 0..14, so `h8` is the center `(7, 7)`.

use thiserror::Error;

use crate::record::{GameRecord, Move, Winner, BOARD_SIZE};

use super::xml::RawGame;

/// Errors that disqualify a single game from the corpus.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("game has no move text")]
    MissingMoveText,

    #[error("malformed move token '{0}'")]
    BadMoveToken(String),

    #[error("move '{0}' is off the board")]
    CoordinateOffBoard(String),

    #[error("missing ruleset attribute")]
    MissingRuleset,

    #[error("unparseable ruleset '{0}'")]
    BadRuleset(String),
}

/// Decodes one move token into a board move.
pub fn decode_move(token: &str) -> Result<Move, ParseError> {
    let mut chars = token.chars();
    let col = chars
        .next()
        .ok_or_else(|| ParseError::BadMoveToken(token.to_string()))?;
    let row = chars.as_str();
    if !col.is_ascii_lowercase() || row.is_empty() || !row.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::BadMoveToken(token.to_string()));
    }
    let row: usize = row
        .parse()
        .map_err(|_| ParseError::BadMoveToken(token.to_string()))?;
    if row == 0 {
        return Err(ParseError::BadMoveToken(token.to_string()));
    }

    let x = col as usize - 'a' as usize;
    let y = row - 1;
    if x >= BOARD_SIZE || y >= BOARD_SIZE {
        return Err(ParseError::CoordinateOffBoard(token.to_string()));
    }
    Ok(Move::new(x as u8, y as u8))
}

/// Interprets the `bresult` attribute, Black's result: `"1"` is a Black
/// win, `"0"` a White win, and anything else (including `"0.5"` or a
/// missing attribute) a draw.
fn decode_winner(bresult: Option<&str>) -> Winner {
    match bresult {
        Some("1") => Winner::Black,
        Some("0") => Winner::White,
        _ => Winner::Draw,
    }
}

/// Extracts a validated game record from a raw scanned game.
pub fn extract_game(raw: &RawGame) -> Result<GameRecord, ParseError> {
    let rule = raw.rule.as_deref().ok_or(ParseError::MissingRuleset)?;
    let ruleset: u32 = rule
        .parse()
        .map_err(|_| ParseError::BadRuleset(rule.to_string()))?;

    let text = raw.moves.as_deref().ok_or(ParseError::MissingMoveText)?;
    let mut moves = Vec::new();
    for token in text.split_whitespace() {
        moves.push(decode_move(token)?);
    }
    if moves.is_empty() {
        return Err(ParseError::MissingMoveText);
    }

    Ok(GameRecord {
        id: raw.id.clone(),
        opening: raw.opening.clone(),
        tournament: raw.tournament.clone(),
        ruleset,
        winner: decode_winner(raw.bresult.as_deref()),
        moves,
        augmented: false,
    })
}
