use aggro_core::error::{ProxyError, ProxyResult};
use aggro_core::session::Session;
use log::debug;

use crate::command_handler::{report_error, CommandContext};
use crate::uci::UciResponse;

/// `isready`: make sure an engine is running, then acknowledge.
///
/// `readyok` is sent even when the engine failed to start; the failure is
/// reported first and the next command retries.
pub(crate) fn handle_uci_ready(ctx: &mut CommandContext) -> ProxyResult<()> {
    if let Err(e) = ctx.gateway.ensure(ctx.config, ctx.launcher) {
        report_error(&mut *ctx.out, &ProxyError::from(e))?;
    }
    ctx.send(UciResponse::ReadyOk)?;
    Ok(())
}

/// `ucinewgame`: fresh session at the start position, engine notified
pub(crate) fn handle_uci_new_game(ctx: &mut CommandContext) -> ProxyResult<()> {
    *ctx.session = Session::new();
    debug!("Session reset for new game");

    if let Some(gateway) = ctx.gateway.get_mut() {
        if let Err(e) = gateway.new_game() {
            ctx.gateway.invalidate_on(&e);
            return Err(e.into());
        }
    }
    Ok(())
}
