use aggro_core::error::ProxyResult;
use aggro_core::session::{Session, StartSpec};
use log::debug;

use crate::command_handler::CommandContext;

/// Replace the session with `fen` (or the start position) plus `moves`.
///
/// An unusable FEN keeps the previous session. A rejected move keeps the
/// moves before it and is reported.
pub(crate) fn handle_position_command(
    fen: Option<String>,
    moves: Vec<String>,
    ctx: &mut CommandContext,
) -> ProxyResult<()> {
    debug!("Handling position command - fen: {fen:?}, moves: {moves:?}");

    let spec = match fen {
        Some(fen) => StartSpec::Fen(fen),
        None => StartSpec::Standard,
    };
    let replay = Session::replay(&spec, &moves[..])?;
    *ctx.session = replay.session;
    debug!("Position set: {} ({} moves)", ctx.session.board(), ctx.session.moves().len());

    match replay.rejected {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
