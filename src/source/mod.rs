//! Game-record source handling.
//!
//! This module reads renju.net XML database exports and turns them into
//! validated `GameRecord`s: `xml` scans the `<games>` section into raw
//! per-game attribute/move-text bundles, `extract` decodes move tokens and
//! metadata into the typed record the rest of the pipeline consumes.

pub mod extract;
pub mod xml;

pub use extract::{extract_game, ParseError};
pub use xml::{scan_games, RawGame, SourceError};
