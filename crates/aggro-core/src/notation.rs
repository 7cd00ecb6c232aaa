//! UCI move notation on top of the `cozy-chess` rules implementation.
//!
//! `cozy-chess` encodes castling as "king captures own rook" (`e1h1`), while
//! GUIs and engines speak standard UCI (`e1g1`). Everything that crosses the
//! protocol boundary goes through these helpers.

use cozy_chess::{Board, File, Move, Piece, Square};

/// Null move sentinel sent when no legal move exists
pub const NULL_MOVE: &str = "0000";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("malformed move token '{0}'")]
    Malformed(String),

    #[error("illegal move '{0}'")]
    Illegal(String),
}

/// All legal moves in generation order
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::new();
    board.generate_moves(|piece_moves| {
        moves.extend(piece_moves);
        false
    });
    moves
}

pub fn has_legal_moves(board: &Board) -> bool {
    // generate_moves は listener が true を返すと打ち切る
    board.generate_moves(|piece_moves| !piece_moves.is_empty())
}

/// Render a legal move of `board` in standard UCI notation
pub fn format_uci_move(board: &Board, mv: Move) -> String {
    let castles = board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == Some(board.side_to_move());
    if castles {
        let file = if (mv.to.file() as u8) > (mv.from.file() as u8) {
            File::G
        } else {
            File::C
        };
        let to = Square::new(file, mv.from.rank());
        return format!("{}{}", mv.from, to);
    }
    mv.to_string()
}

/// Parse a UCI token against the legal moves of `board`.
///
/// Matching against generated moves keeps castling and promotion encoding
/// consistent with the rules crate.
pub fn parse_uci_move(board: &Board, token: &str) -> Result<Move, NotationError> {
    let token = token.trim().to_ascii_lowercase();
    if token.parse::<Move>().is_err() {
        return Err(NotationError::Malformed(token));
    }
    legal_moves(board)
        .into_iter()
        .find(|&mv| format_uci_move(board, mv) == token)
        .ok_or(NotationError::Illegal(token))
}

/// First legal move in UCI notation, or the null move sentinel
pub fn first_legal_or_null(board: &Board) -> String {
    legal_moves(board)
        .first()
        .map(|&mv| format_uci_move(board, mv))
        .unwrap_or_else(|| NULL_MOVE.to_string())
}
