//! Attacking-score capability.
//!
//! The selector only needs "given a game and a player name, how attacking was
//! that player's play". Implementations are swappable behind
//! [`AttackingEvaluator`].

mod heuristic;

pub use heuristic::HeuristicEvaluator;

use cozy_chess::{Board, Color, Move};

use crate::error::EvalError;

/// Result tag of a (possibly hypothetical) game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
    Unfinished,
}

impl Outcome {
    pub fn won_by(color: Color) -> Self {
        match color {
            Color::White => Outcome::WhiteWins,
            Color::Black => Outcome::BlackWins,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            Outcome::WhiteWins => Some(Color::White),
            Outcome::BlackWins => Some(Color::Black),
            Outcome::Draw | Outcome::Unfinished => None,
        }
    }
}

/// A game as handed to an evaluator: root position, moves, players, result
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub root: Board,
    pub moves: Vec<Move>,
    pub white: String,
    pub black: String,
    pub outcome: Outcome,
}

impl GameRecord {
    /// Which color `player` had, matched against the headers
    pub fn color_of(&self, player: &str) -> Option<Color> {
        if self.white == player {
            Some(Color::White)
        } else if self.black == player {
            Some(Color::Black)
        } else {
            None
        }
    }
}

/// Scores how attacking a player's play was in a game
pub trait AttackingEvaluator {
    /// Scalar attacking score for `player`; larger is more attacking.
    /// Observed range is roughly [0, 1] but callers must not rely on a clamp.
    fn attacking_score(&self, game: &GameRecord, player: &str) -> Result<f64, EvalError>;
}

impl<T: AttackingEvaluator + ?Sized> AttackingEvaluator for Box<T> {
    fn attacking_score(&self, game: &GameRecord, player: &str) -> Result<f64, EvalError> {
        (**self).attacking_score(game, player)
    }
}
