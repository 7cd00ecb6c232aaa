use aggro_core::notation::{first_legal_or_null, format_uci_move, parse_uci_move, NULL_MOVE};
use cozy_chess::Board;
use log::{info, warn};

/// Move to send when selection produced nothing usable.
///
/// Preference order:
/// 1. The engine's own bestmove, if it is legal here
/// 2. The first legal move in generation order
/// 3. The null move (no legal move exists)
pub fn fallback_move(board: &Board, engine_best: Option<&str>) -> String {
    if let Some(best) = engine_best {
        match parse_uci_move(board, best) {
            Ok(mv) => {
                info!("Falling back to engine bestmove {best}");
                return format_uci_move(board, mv);
            }
            Err(e) => warn!("Engine bestmove rejected: {e}"),
        }
    }
    let mv = first_legal_or_null(board);
    if mv == NULL_MOVE {
        warn!("No legal moves, sending null move");
    } else {
        info!("Falling back to first legal move {mv}");
    }
    mv
}
