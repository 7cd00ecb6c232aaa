use cozy_chess::{Color, Piece, Square};

use super::{AttackingEvaluator, GameRecord};
use crate::error::EvalError;

const CHECK_WEIGHT: f64 = 1.0;
const CAPTURE_WEIGHT: f64 = 0.6;
const KING_ZONE_WEIGHT: f64 = 0.4;
const PAWN_STORM_WEIGHT: f64 = 0.2;
const WIN_BONUS: f64 = 0.25;
/// Chebyshev distance counted as "near the enemy king"
const KING_ZONE_RADIUS: i8 = 2;

/// Lightweight stand-in for an external attacking-style scorer.
///
/// Replays the game and rewards checks, captures, moves landing near the enemy
/// king and pawns pushed into the enemy half. The mean per-move reward (plus a
/// bonus when the player is marked as winner) is squashed with `1 - e^-x`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Tally {
    moves: u32,
    checks: u32,
    captures: u32,
    king_zone: u32,
    pawn_storm: u32,
}

impl Tally {
    fn weighted_mean(&self) -> f64 {
        if self.moves == 0 {
            return 0.0;
        }
        let total = CHECK_WEIGHT * self.checks as f64
            + CAPTURE_WEIGHT * self.captures as f64
            + KING_ZONE_WEIGHT * self.king_zone as f64
            + PAWN_STORM_WEIGHT * self.pawn_storm as f64;
        total / self.moves as f64
    }
}

fn chebyshev(a: Square, b: Square) -> i8 {
    let df = (a.file() as i8 - b.file() as i8).abs();
    let dr = (a.rank() as i8 - b.rank() as i8).abs();
    df.max(dr)
}

fn in_enemy_half(sq: Square, color: Color) -> bool {
    let rank = sq.rank() as u8;
    match color {
        Color::White => rank >= 4,
        Color::Black => rank <= 3,
    }
}

fn tally(game: &GameRecord, color: Color) -> Result<Tally, EvalError> {
    let mut board = game.root.clone();
    let mut tally = Tally::default();

    for (ply, &mv) in game.moves.iter().enumerate() {
        if !board.is_legal(mv) {
            return Err(EvalError::Replay(format!("illegal move {mv} at ply {ply}")));
        }
        let mover = board.side_to_move();
        if mover != color {
            board.play_unchecked(mv);
            continue;
        }

        let capture = board.color_on(mv.to) == Some(!mover);
        let pawn = board.piece_on(mv.from) == Some(Piece::Pawn);
        let enemy_king = board.king(!mover);

        board.play_unchecked(mv);

        tally.moves += 1;
        if capture {
            tally.captures += 1;
        }
        if !board.checkers().is_empty() {
            tally.checks += 1;
        }
        if chebyshev(mv.to, enemy_king) <= KING_ZONE_RADIUS {
            tally.king_zone += 1;
        }
        if pawn && in_enemy_half(mv.to, mover) {
            tally.pawn_storm += 1;
        }
    }

    Ok(tally)
}

impl AttackingEvaluator for HeuristicEvaluator {
    fn attacking_score(&self, game: &GameRecord, player: &str) -> Result<f64, EvalError> {
        let color = game
            .color_of(player)
            .ok_or_else(|| EvalError::UnknownPlayer(player.to_string()))?;
        let tally = tally(game, color)?;
        if tally.moves == 0 {
            return Err(EvalError::EmptyGame);
        }

        let mut x = tally.weighted_mean();
        if game.outcome.winner() == Some(color) {
            x += WIN_BONUS;
        }
        Ok(1.0 - (-x).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Outcome;
    use crate::notation::parse_uci_move;
    use cozy_chess::Board;

    fn record(fen: Option<&str>, moves: &[&str], outcome: Outcome) -> GameRecord {
        let root = match fen {
            Some(f) => Board::from_fen(f, false).unwrap(),
            None => Board::default(),
        };
        let mut board = root.clone();
        let mut parsed = Vec::new();
        for m in moves {
            let mv = parse_uci_move(&board, m).unwrap();
            board.play(mv);
            parsed.push(mv);
        }
        GameRecord {
            root,
            moves: parsed,
            white: "Aggro".to_string(),
            black: "Opponent".to_string(),
            outcome,
        }
    }

    #[test]
    fn test_quiet_moves_score_low() {
        let game = record(None, &["g1f3", "g8f6", "b1c3"], Outcome::Unfinished);
        let score = HeuristicEvaluator.attacking_score(&game, "Aggro").unwrap();
        assert!(score < 0.05, "score = {score}");
    }

    #[test]
    fn test_checks_and_captures_score_higher() {
        let quiet = record(None, &["g1f3", "g8f6", "b1c3"], Outcome::WhiteWins);
        // Scholar's mate: queen and bishop hit f7
        let sharp = record(
            None,
            &["e2e4", "e7e5", "d1h5", "b8c6", "f1c4", "g8f6", "h5f7"],
            Outcome::WhiteWins,
        );
        let quiet_score = HeuristicEvaluator.attacking_score(&quiet, "Aggro").unwrap();
        let sharp_score = HeuristicEvaluator.attacking_score(&sharp, "Aggro").unwrap();
        assert!(sharp_score > quiet_score);
        assert!((0.0..1.0).contains(&sharp_score));
    }

    #[test]
    fn test_win_bonus_applies_to_named_player_only() {
        let won = record(None, &["e2e4", "e7e5"], Outcome::WhiteWins);
        let lost = record(None, &["e2e4", "e7e5"], Outcome::BlackWins);
        let a = HeuristicEvaluator.attacking_score(&won, "Aggro").unwrap();
        let b = HeuristicEvaluator.attacking_score(&lost, "Aggro").unwrap();
        assert!(a > b);
    }

    #[test]
    fn test_unknown_player_and_empty_game() {
        let game = record(None, &["e2e4"], Outcome::Unfinished);
        assert!(matches!(
            HeuristicEvaluator.attacking_score(&game, "Nobody"),
            Err(EvalError::UnknownPlayer(_))
        ));
        // Black has not moved yet
        assert!(matches!(
            HeuristicEvaluator.attacking_score(&game, "Opponent"),
            Err(EvalError::EmptyGame)
        ));
    }

    #[test]
    fn test_illegal_replay_is_reported() {
        let mut game = record(None, &["e2e4"], Outcome::Unfinished);
        // 同じ手をもう一度指させる
        let dup = game.moves[0];
        game.moves.push(dup);
        assert!(matches!(
            HeuristicEvaluator.attacking_score(&game, "Aggro"),
            Err(EvalError::Replay(_))
        ));
    }
}
