//! Canonical position aggregation.
//!
//! Every ply boundary of every surviving game contributes one observation:
//! the encoded position just before the ply, the move actually played, and
//! the game outcome for the side to move. Observations are grouped by the
//! exact tensor bytes, so two positions are "the same" iff their encodings
//! are byte-identical, and each group reduces to a single majority move and
//! majority outcome.
//!
//! The table keeps votes in first-seen order and replaces a running best
//! only on a strictly greater count, which makes ties break to the value
//! observed first. Reduction emits entries in key first-seen order, so a
//! whole run is deterministic for a fixed shuffle seed.

use std::collections::HashMap;

use crate::encoding::encode_history;
use crate::record::{GameRecord, Move};

/// Vote tallies for one unique position.
#[derive(Debug, Default)]
struct PositionVotes {
    moves: Vec<(Move, u32)>,
    outcomes: Vec<(i8, u32)>,
}

/// One unique position reduced to its majority labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalEntry {
    /// Serialized gamestate tensor.
    pub tensor: Vec<u8>,
    /// Majority next move.
    pub next_move: Move,
    /// Majority outcome for the side to move: +1 win, -1 loss, 0 draw.
    pub outcome: i8,
}

/// Accumulates label observations keyed by exact tensor bytes.
#[derive(Debug, Default)]
pub struct PositionTable {
    index: HashMap<Vec<u8>, usize>,
    votes: Vec<PositionVotes>,
    observations: usize,
}

impl PositionTable {
    pub fn new() -> PositionTable {
        PositionTable::default()
    }

    /// Number of unique positions seen so far.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Total observations recorded, counting duplicates.
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Records one observation of a position.
    pub fn observe(&mut self, key: Vec<u8>, next_move: Move, outcome: i8) {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.votes.len();
                self.votes.push(PositionVotes::default());
                self.index.insert(key, slot);
                slot
            }
        };
        let votes = &mut self.votes[slot];
        tally(&mut votes.moves, next_move);
        tally(&mut votes.outcomes, outcome);
        self.observations += 1;
    }

    /// Reduces every position to its majority labels, in key first-seen
    /// order. Each key is fully reduced before the result is handed on.
    pub fn reduce(self) -> Vec<CanonicalEntry> {
        let mut keyed: Vec<(Vec<u8>, usize)> = self.index.into_iter().collect();
        keyed.sort_unstable_by_key(|&(_, slot)| slot);

        keyed
            .into_iter()
            .map(|(tensor, slot)| {
                let votes = &self.votes[slot];
                CanonicalEntry {
                    tensor,
                    next_move: majority(&votes.moves),
                    outcome: majority(&votes.outcomes),
                }
            })
            .collect()
    }
}

/// Walks every ply boundary of a game and records its observations.
pub fn accumulate_game(table: &mut PositionTable, game: &GameRecord, history_depth: usize) {
    for ply in 1..game.moves.len() {
        let state = encode_history(&game.moves[..ply], history_depth);
        let outcome = game.winner.score_for(game.to_move_at(ply));
        table.observe(state.into_bytes(), game.moves[ply], outcome);
    }
}

fn tally<T: Copy + PartialEq>(votes: &mut Vec<(T, u32)>, value: T) {
    match votes.iter_mut().find(|(v, _)| *v == value) {
        Some((_, count)) => *count += 1,
        None => votes.push((value, 1)),
    }
}

/// The value with the strictly highest count; ties break to the value
/// observed first.
fn majority<T: Copy>(votes: &[(T, u32)]) -> T {
    let mut best = votes[0];
    for &(value, count) in &votes[1..] {
        if count > best.1 {
            best = (value, count);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Move, Winner};

    fn game(moves: &[(u8, u8)], winner: Winner) -> GameRecord {
        GameRecord {
            id: "g".to_string(),
            opening: None,
            tournament: None,
            ruleset: 1,
            winner,
            moves: moves.iter().map(|&(x, y)| Move::new(x, y)).collect(),
            augmented: false,
        }
    }

    #[test]
    fn majority_picks_highest_count() {
        let mut table = PositionTable::new();
        let key = vec![0u8; 4];
        for _ in 0..3 {
            table.observe(key.clone(), Move::new(0, 0), 1);
        }
        for _ in 0..5 {
            table.observe(key.clone(), Move::new(1, 1), -1);
        }
        for _ in 0..2 {
            table.observe(key.clone(), Move::new(2, 2), 1);
        }
        let entries = table.reduce();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].next_move, Move::new(1, 1));
        // Outcomes: +1 seen 5 times, -1 seen 5 times; +1 was first.
        assert_eq!(entries[0].outcome, 1);
    }

    #[test]
    fn single_observation_reduces_to_itself() {
        let mut table = PositionTable::new();
        table.observe(vec![1, 2, 3], Move::new(4, 5), -1);
        let entries = table.reduce();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].tensor, vec![1, 2, 3]);
        assert_eq!(entries[0].next_move, Move::new(4, 5));
        assert_eq!(entries[0].outcome, -1);
    }

    #[test]
    fn ties_break_to_first_observed() {
        let mut table = PositionTable::new();
        let key = vec![9u8; 8];
        table.observe(key.clone(), Move::new(3, 3), 0);
        table.observe(key.clone(), Move::new(4, 4), 0);
        table.observe(key.clone(), Move::new(4, 4), 0);
        table.observe(key.clone(), Move::new(3, 3), 0);
        let entries = table.reduce();
        assert_eq!(entries[0].next_move, Move::new(3, 3));
    }

    #[test]
    fn move_and_outcome_reductions_are_independent() {
        let mut table = PositionTable::new();
        let key = vec![7u8; 8];
        table.observe(key.clone(), Move::new(0, 0), -1);
        table.observe(key.clone(), Move::new(1, 1), 1);
        table.observe(key.clone(), Move::new(1, 1), -1);
        let entries = table.reduce();
        assert_eq!(entries[0].next_move, Move::new(1, 1));
        assert_eq!(entries[0].outcome, -1);
    }

    #[test]
    fn reduce_preserves_first_seen_order() {
        let mut table = PositionTable::new();
        for i in 0..20u8 {
            table.observe(vec![i], Move::new(0, 0), 0);
        }
        let entries = table.reduce();
        let keys: Vec<u8> = entries.iter().map(|e| e.tensor[0]).collect();
        assert_eq!(keys, (0..20u8).collect::<Vec<_>>());
    }

    #[test]
    fn three_move_game_yields_two_positions() {
        let mut table = PositionTable::new();
        let g = game(&[(7, 7), (7, 8), (8, 7)], Winner::Black);
        accumulate_game(&mut table, &g, 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.observations(), 2);

        let entries = table.reduce();
        // Position after one ply: White to move, next move (7,8), Black
        // eventually wins so the side to move loses.
        assert_eq!(entries[0].next_move, Move::new(7, 8));
        assert_eq!(entries[0].outcome, -1);
        // Position after two plies: Black to move, next move (8,7), wins.
        assert_eq!(entries[1].next_move, Move::new(8, 7));
        assert_eq!(entries[1].outcome, 1);
    }

    #[test]
    fn one_move_game_yields_no_positions() {
        let mut table = PositionTable::new();
        accumulate_game(&mut table, &game(&[(7, 7)], Winner::Draw), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn identical_positions_across_games_collapse() {
        let mut table = PositionTable::new();
        let a = game(&[(7, 7), (7, 8), (8, 7)], Winner::Black);
        let b = game(&[(7, 7), (7, 8), (9, 9)], Winner::White);
        accumulate_game(&mut table, &a, 2);
        accumulate_game(&mut table, &b, 2);
        // Both games share their one-ply and two-ply prefixes, so only two
        // unique keys exist despite four observations.
        assert_eq!(table.len(), 2);
        assert_eq!(table.observations(), 4);

        let entries = table.reduce();
        // Both games played (7,8) from the first position.
        assert_eq!(entries[0].next_move, Move::new(7, 8));
        // From the second position the games diverge; (8,7) was first.
        assert_eq!(entries[1].next_move, Move::new(8, 7));
    }

    #[test]
    fn outcome_flips_with_side_to_move() {
        let mut table = PositionTable::new();
        let g = game(&[(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)], Winner::White);
        accumulate_game(&mut table, &g, 4);
        let entries = table.reduce();
        assert_eq!(entries.len(), 4);
        // Plies 1..=4: to-move alternates W, B, W, B; White wins.
        assert_eq!(
            entries.iter().map(|e| e.outcome).collect::<Vec<_>>(),
            vec![1, -1, 1, -1]
        );
    }
}
