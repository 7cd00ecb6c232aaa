//! Candidate selection: re-rank the wrapped engine's MultiPV lines by
//! attacking quality among the lines that are close enough to the best one.

use std::cmp::Ordering;

use cozy_chess::Move;
use log::{debug, warn};

use crate::config::EngineConfig;
use crate::evaluator::{AttackingEvaluator, GameRecord, Outcome};
use crate::gateway::{CandidateLine, Score, SearchReport};
use crate::notation::{format_uci_move, parse_uci_move};
use crate::session::Session;

/// Normalized value of any mate score
pub const MATE_SCORE: i32 = 10_000;

/// Score reported on fallback, when nothing survived filtering
pub const NEUTRAL_SCORE: i32 = 0;

/// Lowest attacking score; used when evaluation fails
pub const MIN_ATTACKING_SCORE: f64 = 0.0;

/// Map a raw engine score onto one comparable integer scale.
///
/// `mate 0` (mate already on the board in this line) counts as a win.
pub fn normalize(score: Score) -> i32 {
    match score {
        Score::Cp(cp) => cp,
        Score::Mate(n) if n < 0 => -MATE_SCORE,
        Score::Mate(_) => MATE_SCORE,
    }
}

/// A line that passed filtering, with its attacking score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub rank: u32,
    /// First move, UCI notation
    pub uci: String,
    pub score: i32,
    pub attacking: f64,
    /// Prefix of the pv that replayed legally
    pub pv: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// `None` only when nothing survived and the engine gave no bestmove
    pub chosen: Option<String>,
    /// Normalized score of the chosen line, or [`NEUTRAL_SCORE`] on fallback
    pub score: i32,
    /// Survivors, most attacking first
    pub survivors: Vec<ScoredCandidate>,
    pub fallback: bool,
}

/// Lines with a score and a non-empty pv, paired with their normalized score
pub fn usable_lines(lines: &[CandidateLine]) -> Vec<(&CandidateLine, i32)> {
    lines
        .iter()
        .filter(|l| !l.pv.is_empty())
        .filter_map(|l| l.score.map(|s| (l, normalize(s))))
        .collect()
}

/// Threshold filter. `best - score <= max_loss` is measured against the best
/// usable line, not against the engine's rank 1.
pub fn filter_lines(lines: &[CandidateLine], min_score: i32, max_loss: i32) -> Vec<(&CandidateLine, i32)> {
    let usable = usable_lines(lines);
    let Some(best) = usable.iter().map(|&(_, s)| s).max() else {
        return Vec::new();
    };
    usable
        .into_iter()
        .filter(|&(_, s)| s >= min_score && i64::from(best) - i64::from(s) <= i64::from(max_loss))
        .collect()
}

/// Replay `pv` from the session's position, stopping at the first move that
/// does not apply
fn replay_pv(session: &Session, pv: &[String]) -> (Vec<Move>, Vec<String>) {
    let mut board = session.board().clone();
    let mut moves = Vec::new();
    let mut tokens = Vec::new();
    for token in pv {
        match parse_uci_move(&board, token) {
            Ok(mv) => {
                tokens.push(format_uci_move(&board, mv));
                board.play_unchecked(mv);
                moves.push(mv);
            }
            Err(e) => {
                debug!("pv truncated at {token}: {e}");
                break;
            }
        }
    }
    (moves, tokens)
}

/// The session's game continued with `continuation`, won by the side to move
/// and played by `own_name` from that side
fn hypothetical_game(session: &Session, continuation: Vec<Move>, config: &EngineConfig) -> GameRecord {
    let mut record = session.to_record();
    record.moves.extend(continuation);
    let us = session.side_to_move();
    let (white, black) = match us {
        cozy_chess::Color::White => (&config.own_name, &config.opponent_name),
        cozy_chess::Color::Black => (&config.opponent_name, &config.own_name),
    };
    record.white = white.clone();
    record.black = black.clone();
    record.outcome = Outcome::won_by(us);
    record
}

/// Choose one move from a finished search.
///
/// The caller must make sure the position has at least one legal move.
pub fn select(
    report: &SearchReport,
    session: &Session,
    config: &EngineConfig,
    evaluator: &dyn AttackingEvaluator,
) -> Selection {
    let mut survivors = Vec::new();

    for (line, score) in filter_lines(&report.lines, config.min_score, config.max_loss) {
        let (moves, pv) = replay_pv(session, &line.pv);
        let Some(uci) = pv.first().cloned() else {
            warn!("multipv {} starts with unplayable move {}, skipped", line.rank, line.pv[0]);
            continue;
        };

        let game = hypothetical_game(session, moves, config);
        let attacking = match evaluator.attacking_score(&game, &config.own_name) {
            Ok(v) if v.is_finite() => v,
            Ok(v) => {
                warn!("multipv {}: non-finite attacking score {v}", line.rank);
                MIN_ATTACKING_SCORE
            }
            Err(e) => {
                warn!("multipv {}: attacking evaluation failed: {e}", line.rank);
                MIN_ATTACKING_SCORE
            }
        };
        survivors.push(ScoredCandidate {
            rank: line.rank,
            uci,
            score,
            attacking,
            pv,
        });
    }

    // stable sort: equal attacking scores keep the engine's order
    survivors.sort_by(|a, b| b.attacking.partial_cmp(&a.attacking).unwrap_or(Ordering::Equal));

    match survivors.first().map(|top| (top.uci.clone(), top.score)) {
        Some((uci, score)) => Selection {
            chosen: Some(uci),
            score,
            fallback: false,
            survivors,
        },
        None => Selection {
            chosen: report.best_move.clone(),
            score: NEUTRAL_SCORE,
            survivors,
            fallback: true,
        },
    }
}
