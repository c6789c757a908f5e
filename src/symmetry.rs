//! Board symmetry transforms and whole-game augmentation.
//!
//! The square board admits mirror and rotation symmetries; applying one
//! transform uniformly to every move of a game yields an equally valid game
//! with identical move-order and turn semantics. Augmentation expands each
//! source game into the five non-identity variants used by the original
//! dataset generator.

use crate::record::{GameRecord, Move, BOARD_SIZE};

const MAX: u8 = (BOARD_SIZE - 1) as u8;

/// A board symmetry applied to move coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    Identity,
    MirrorX,
    MirrorY,
    Rotate90,
    Rotate180,
    Rotate270,
}

/// The transforms used for augmentation, identity excluded.
pub const AUGMENTING: [Symmetry; 5] = [
    Symmetry::MirrorX,
    Symmetry::MirrorY,
    Symmetry::Rotate90,
    Symmetry::Rotate180,
    Symmetry::Rotate270,
];

impl Symmetry {
    /// Applies the transform to a single move.
    pub const fn apply(self, m: Move) -> Move {
        match self {
            Symmetry::Identity => m,
            Symmetry::MirrorX => Move::new(MAX - m.x, m.y),
            Symmetry::MirrorY => Move::new(m.x, MAX - m.y),
            Symmetry::Rotate90 => Move::new(MAX - m.y, m.x),
            Symmetry::Rotate180 => Move::new(MAX - m.x, MAX - m.y),
            Symmetry::Rotate270 => Move::new(m.y, MAX - m.x),
        }
    }

    /// Applies the transform to every move of a game, preserving metadata
    /// and marking the result as augmented.
    pub fn apply_game(self, game: &GameRecord) -> GameRecord {
        let mut derived = game.clone();
        for m in derived.moves.iter_mut() {
            *m = self.apply(*m);
        }
        derived.augmented = true;
        derived
    }
}

/// Produces the five augmented variants of a game.
pub fn augment(game: &GameRecord) -> Vec<GameRecord> {
    AUGMENTING.iter().map(|s| s.apply_game(game)).collect()
}
