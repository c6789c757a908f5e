//! Move-history -> gamestate tensor encoding.
//!
//! Produces the `(HD + 1, 15, 15)` byte-boolean tensor consumed by the
//! policy/value learner, where `HD` is the configured history depth (even).
//! With `half = HD / 2` the plane layout is:
//!
//! ```text
//!   0             turn plane, constant 0 (Black to move) or 1 (White)
//!   1 ..= half    Black half-stack
//!   half+1 ..= HD White half-stack
//! ```
//!
//! Moves older than the newest `HD` plies ("general" stones) are marked on
//! every plane of their color's half-stack, encoding presence without age.
//! The newest `HD` plies are marked on a footprint that grows with recency:
//! a move at window offset `o` (oldest first) covers `o / 2 + 1` planes of
//! its half-stack, anchored at the accumulation plane (`half` for Black,
//! `HD` for White) and extending toward the turn plane. Plane proximity to
//! the accumulation plane thus encodes how far back in the window a stone
//! may sit, and no stone ever covers more than `half` planes.
//!
//! Byte layout is plane-major then x-major; the serialized tensor doubles
//! as the deduplication key, so encoding must stay byte-stable.

use crate::record::{Color, Move, CELLS};

/// Number of planes for a given history depth.
pub const fn plane_count(history_depth: usize) -> usize {
    history_depth + 1
}

/// An encoded position: `(HD + 1, 15, 15)` bytes, each 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gamestate {
    history_depth: usize,
    data: Vec<u8>,
}

impl Gamestate {
    pub fn plane_count(&self) -> usize {
        plane_count(self.history_depth)
    }

    /// The exact serialized form, used as the dataset key.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Reads one cell of one plane.
    pub fn get(&self, plane: usize, m: Move) -> bool {
        self.data[plane * CELLS + m.index()] != 0
    }

    /// Number of set cells on one plane.
    pub fn plane_popcount(&self, plane: usize) -> usize {
        self.data[plane * CELLS..(plane + 1) * CELLS]
            .iter()
            .filter(|&&b| b != 0)
            .count()
    }
}

/// Encodes the position reached after `moves`, with per-ply temporal
/// resolution over the newest `history_depth` plies.
///
/// `history_depth` must be even; the empty prefix encodes Black to move
/// with all stone planes clear.
pub fn encode_history(moves: &[Move], history_depth: usize) -> Gamestate {
    debug_assert!(history_depth % 2 == 0, "history depth must be even");
    let half = history_depth / 2;
    let mut data = vec![0u8; plane_count(history_depth) * CELLS];

    // Ply `moves.len()` is the one about to be played.
    let to_move = Color::of_ply(moves.len());
    data[..CELLS].fill(to_move.plane_value());

    let general_len = moves.len().saturating_sub(history_depth);
    for (ply, m) in moves[..general_len].iter().enumerate() {
        let planes = match Color::of_ply(ply) {
            Color::Black => 1..=half,
            Color::White => half + 1..=history_depth,
        };
        for plane in planes {
            data[plane * CELLS + m.index()] = 1;
        }
    }

    for (offset, (ply, m)) in moves.iter().enumerate().skip(general_len).enumerate() {
        let local = offset / 2;
        let anchor = match Color::of_ply(ply) {
            Color::Black => half,
            Color::White => history_depth,
        };
        for plane in anchor - local..=anchor {
            data[plane * CELLS + m.index()] = 1;
        }
    }

    Gamestate {
        history_depth,
        data,
    }
}
