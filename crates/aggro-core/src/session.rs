//! Game session tracked across `position` / `ucinewgame` commands.
//!
//! A session is never patched in place: every `position` command builds a
//! fresh one by replaying its move list from the root, and the dispatcher
//! swaps it in wholesale.

use cozy_chess::{Board, Color, Move};
use log::debug;

use crate::error::PositionError;
use crate::evaluator::{GameRecord, Outcome};
use crate::notation::{format_uci_move, parse_uci_move};

/// Root of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartSpec {
    /// Standard starting position
    Standard,
    /// Explicit board description
    Fen(String),
}

/// Player headers carried with the session's game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameHeaders {
    pub white: String,
    pub black: String,
}

impl Default for GameHeaders {
    fn default() -> Self {
        Self {
            white: "?".to_string(),
            black: "?".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    start: StartSpec,
    root: Board,
    moves: Vec<Move>,
    /// Applied moves in UCI notation, parallel to `moves`
    tokens: Vec<String>,
    board: Board,
    headers: GameHeaders,
}

/// Outcome of replaying a `position` command
#[derive(Debug)]
pub struct Replay {
    pub session: Session,
    /// Set when replay stopped early; moves before it remain applied
    pub rejected: Option<PositionError>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Fresh session at the standard starting position
    pub fn new() -> Self {
        let root = Board::default();
        Self {
            start: StartSpec::Standard,
            board: root.clone(),
            root,
            moves: Vec::new(),
            tokens: Vec::new(),
            headers: GameHeaders::default(),
        }
    }

    /// Build a session rooted at `spec` with no moves applied
    pub fn from_spec(spec: &StartSpec) -> Result<Self, PositionError> {
        match spec {
            StartSpec::Standard => Ok(Self::new()),
            StartSpec::Fen(fen) => {
                let root = Board::from_fen(fen, false).map_err(|e| PositionError::Fen {
                    fen: fen.clone(),
                    reason: format!("{e:?}"),
                })?;
                Ok(Self {
                    start: spec.clone(),
                    board: root.clone(),
                    root,
                    moves: Vec::new(),
                    tokens: Vec::new(),
                    headers: GameHeaders::default(),
                })
            }
        }
    }

    /// Build a session from `spec` and apply `tokens` in order.
    ///
    /// The first token that is malformed or illegal ends the replay; the
    /// error is returned alongside the partially replayed session. Only an
    /// unusable root is a hard error.
    pub fn replay<S: AsRef<str>>(spec: &StartSpec, tokens: &[S]) -> Result<Replay, PositionError> {
        let mut session = Self::from_spec(spec)?;
        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            if let Err(e) = session.apply_token(token) {
                debug!("replay stopped at #{index} {token}: {e}");
                return Ok(Replay {
                    session,
                    rejected: Some(PositionError::MoveRejected {
                        index,
                        token: token.to_string(),
                        reason: e.to_string(),
                    }),
                });
            }
        }
        Ok(Replay {
            session,
            rejected: None,
        })
    }

    fn apply_token(&mut self, token: &str) -> Result<(), crate::notation::NotationError> {
        let mv = parse_uci_move(&self.board, token)?;
        let uci = format_uci_move(&self.board, mv);
        self.board.play_unchecked(mv);
        self.moves.push(mv);
        self.tokens.push(uci);
        Ok(())
    }

    pub fn start(&self) -> &StartSpec {
        &self.start
    }

    pub fn root(&self) -> &Board {
        &self.root
    }

    /// Current position
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Applied moves in UCI notation
    pub fn move_tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Snapshot of the session's game, unfinished and with the session headers
    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            root: self.root.clone(),
            moves: self.moves.clone(),
            white: self.headers.white.clone(),
            black: self.headers.black.clone(),
            outcome: Outcome::Unfinished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_startpos() {
        let session = Session::new();
        assert_eq!(session.start(), &StartSpec::Standard);
        assert_eq!(session.board().to_string(), Board::default().to_string());
        assert!(session.moves().is_empty());
        assert_eq!(session.side_to_move(), Color::White);
    }

    #[test]
    fn test_replay_matches_independent_application() {
        let replay = Session::replay(&StartSpec::Standard, &["e2e4", "e7e5"]).unwrap();
        assert!(replay.rejected.is_none());

        let mut expected = Board::default();
        expected.play(parse_uci_move(&expected, "e2e4").unwrap());
        expected.play(parse_uci_move(&expected, "e7e5").unwrap());

        assert_eq!(replay.session.board().to_string(), expected.to_string());
        assert_eq!(replay.session.move_tokens(), &["e2e4".to_string(), "e7e5".to_string()]);
    }

    #[test]
    fn test_replay_stops_at_illegal_move() {
        // e2e4 e7e5 e4e5 は3手目が不正（e5 にポーンがいる）
        let replay = Session::replay(&StartSpec::Standard, &["e2e4", "e7e5", "e4e5", "g1f3"]).unwrap();
        assert_eq!(replay.session.moves().len(), 2);
        match replay.rejected {
            Some(PositionError::MoveRejected { index, token, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(token, "e4e5");
            }
            other => panic!("expected MoveRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_replay_stops_at_malformed_token() {
        let replay = Session::replay(&StartSpec::Standard, &["e2e4", "xyz"]).unwrap();
        assert_eq!(replay.session.move_tokens(), &["e2e4".to_string()]);
        assert!(replay.rejected.is_some());
    }

    #[test]
    fn test_replay_from_fen() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
        let replay = Session::replay(&StartSpec::Fen(fen.to_string()), &["e2e4"]).unwrap();
        assert!(replay.rejected.is_none());
        assert_eq!(replay.session.side_to_move(), Color::Black);
        assert_eq!(replay.session.root().to_string(), fen);
    }

    #[test]
    fn test_invalid_fen_is_hard_error() {
        let result = Session::replay(&StartSpec::Fen("not a fen".to_string()), &["e2e4"]);
        assert!(matches!(result, Err(PositionError::Fen { .. })));
    }

    #[test]
    fn test_castling_token_is_normalized() {
        let replay = Session::replay(
            &StartSpec::Standard,
            &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"],
        )
        .unwrap();
        assert!(replay.rejected.is_none());
        assert_eq!(replay.session.move_tokens().last().map(String::as_str), Some("e1g1"));
    }
}
