use aggro_core::config::ProxyOption;
use aggro_core::error::ProxyResult;
use log::info;

use crate::command_handler::CommandContext;

/// Apply a `setoption` and propagate it to the wrapped engine.
///
/// Nothing changes when the name or value is rejected.
pub(crate) fn handle_set_option(
    name: String,
    value: Option<String>,
    ctx: &mut CommandContext,
) -> ProxyResult<()> {
    let opt = ctx.config.set_option(&name, value.as_deref())?;

    if opt == ProxyOption::EnginePath {
        info!("Engine path changed to {}, restarting engine", ctx.config.engine_path);
        ctx.gateway.reset();
        let gateway = ctx.gateway.ensure(ctx.config, ctx.launcher)?;
        let id = gateway.id().clone();
        ctx.send_info_string(format!("wrapping {} by {}", id.name, id.author))?;
        return Ok(());
    }

    if opt.forwarded() {
        // 未起動なら初期化時に engine_settings() として送られる
        if let Some(gateway) = ctx.gateway.get_mut() {
            let value = ctx.config.option_value(opt);
            if let Err(e) = gateway.configure(opt.name(), &value) {
                ctx.gateway.invalidate_on(&e);
                return Err(e.into());
            }
        }
    }
    Ok(())
}
