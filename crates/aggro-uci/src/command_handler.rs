use std::io::{self, Write};

use aggro_core::config::EngineConfig;
use aggro_core::error::{ProxyError, ProxyResult};
use aggro_core::evaluator::AttackingEvaluator;
use aggro_core::gateway::EngineLauncher;
use aggro_core::session::Session;
use log::{debug, warn};

use crate::handlers::game::{handle_uci_new_game, handle_uci_ready};
use crate::handlers::go::handle_go_command;
use crate::handlers::options::handle_set_option;
use crate::handlers::position::handle_position_command;
use crate::state::GatewayState;
use crate::uci::{option_table, send_response, UciCommand, UciResponse, ENGINE_AUTHOR, ENGINE_NAME};

/// Everything a command handler may touch
pub struct CommandContext<'a> {
    pub config: &'a mut EngineConfig,
    pub session: &'a mut Session,
    pub gateway: &'a mut GatewayState,
    pub launcher: &'a dyn EngineLauncher,
    pub evaluator: &'a dyn AttackingEvaluator,
    pub out: &'a mut dyn Write,
}

impl CommandContext<'_> {
    pub(crate) fn send(&mut self, response: UciResponse) -> io::Result<()> {
        send_response(&mut *self.out, &response)
    }

    pub(crate) fn send_info_string(&mut self, msg: impl Into<String>) -> io::Result<()> {
        self.send(UciResponse::String(msg.into()))
    }
}

/// Turn a failed command into an `info string` diagnostic.
///
/// Only an error writing the diagnostic itself is returned.
pub fn report_error(out: &mut dyn Write, err: &ProxyError) -> io::Result<()> {
    warn!("{err}");
    send_response(out, &UciResponse::String(err.to_string()))
}

/// Handle one command other than `quit`
pub fn handle_command(command: UciCommand, ctx: &mut CommandContext) -> ProxyResult<()> {
    match command {
        UciCommand::Uci => handle_uci(ctx)?,

        UciCommand::IsReady => handle_uci_ready(ctx)?,

        UciCommand::SetOption { name, value } => handle_set_option(name, value, ctx)?,

        UciCommand::Position { fen, moves } => handle_position_command(fen, moves, ctx)?,

        UciCommand::Go(params) => handle_go_command(params, ctx)?,

        UciCommand::UciNewGame => handle_uci_new_game(ctx)?,

        // 探索は同期実行なので stop が届く時点で探索中ではない
        cmd @ (UciCommand::Stop | UciCommand::PonderHit) => {
            debug!("{cmd:?} ignored, no search running")
        }

        cmd @ (UciCommand::Debug | UciCommand::Register) => debug!("{cmd:?} ignored"),

        UciCommand::Quit => {}
    }
    Ok(())
}

fn handle_uci(ctx: &mut CommandContext) -> ProxyResult<()> {
    ctx.send(UciResponse::IdName(format!("{ENGINE_NAME} {}", env!("CARGO_PKG_VERSION"))))?;
    ctx.send(UciResponse::IdAuthor(ENGINE_AUTHOR.to_string()))?;

    match ctx.gateway.ensure(ctx.config, ctx.launcher) {
        Ok(gateway) => {
            let id = gateway.id().clone();
            ctx.send_info_string(format!("wrapping {} by {}", id.name, id.author))?;
        }
        // 起動に失敗しても uciok は必ず返す
        Err(e) => report_error(&mut *ctx.out, &ProxyError::from(e))?,
    }

    for option in option_table(ctx.config) {
        ctx.send(UciResponse::Option(option))?;
    }
    ctx.send(UciResponse::UciOk)?;
    Ok(())
}
