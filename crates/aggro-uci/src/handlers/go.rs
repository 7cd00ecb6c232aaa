use aggro_core::error::ProxyResult;
use aggro_core::gateway::Score;
use aggro_core::limits::SearchLimit;
use aggro_core::notation::{has_legal_moves, NULL_MOVE};
use aggro_core::selector::{select, NEUTRAL_SCORE};
use log::{debug, info};

use crate::command_handler::{report_error, CommandContext};
use crate::helpers::fallback_move;
use crate::uci::{GoParams, SearchInfo, UciResponse};

/// `go`: search with the wrapped engine, pick the most attacking acceptable
/// line, answer with `bestmove`.
///
/// A `bestmove` is always sent. Any failure on the way is reported and
/// replaced by a fallback move.
pub(crate) fn handle_go_command(params: GoParams, ctx: &mut CommandContext) -> ProxyResult<()> {
    if params.infinite || params.ponder {
        debug!("go infinite/ponder is not forwarded, using a bounded search");
    }

    if !has_legal_moves(ctx.session.board()) {
        ctx.send_info_string("no legal moves")?;
        ctx.send(UciResponse::BestMove {
            best_move: NULL_MOVE.to_string(),
            ponder: None,
        })?;
        return Ok(());
    }

    let limit = params.to_limit().or_defaults(ctx.config);
    debug!("Search limit: {}", limit.to_go_args());

    let (best_move, score) = match search_and_select(&limit, ctx) {
        Ok(choice) => choice,
        Err(e) => {
            report_error(&mut *ctx.out, &e)?;
            (fallback_move(ctx.session.board(), None), NEUTRAL_SCORE)
        }
    };

    info!("bestmove {best_move} (score {score})");
    ctx.send(UciResponse::Info(SearchInfo {
        depth: limit.depth,
        score: Some(Score::Cp(score)),
        pv: vec![best_move.clone()],
    }))?;
    ctx.send(UciResponse::BestMove {
        best_move,
        ponder: None,
    })?;
    Ok(())
}

/// Run the search and the selector; returns the move and its normalized score
fn search_and_select(limit: &SearchLimit, ctx: &mut CommandContext) -> ProxyResult<(String, i32)> {
    let gateway = ctx.gateway.ensure(ctx.config, ctx.launcher)?;
    let report = match gateway.search(ctx.session, limit) {
        Ok(report) => report,
        Err(e) => {
            ctx.gateway.invalidate_on(&e);
            return Err(e.into());
        }
    };
    let selection = select(&report, ctx.session, ctx.config, ctx.evaluator);

    for candidate in &selection.survivors {
        ctx.send_info_string(format!(
            "candidate {} score {} attacking {:.3}",
            candidate.uci, candidate.score, candidate.attacking
        ))?;
    }

    match selection.chosen {
        Some(mv) if !selection.fallback => Ok((mv, selection.score)),
        engine_best => {
            ctx.send_info_string(format!(
                "no line within MinScore {} / MaxLoss {}, using engine bestmove",
                ctx.config.min_score, ctx.config.max_loss
            ))?;
            let mv = fallback_move(ctx.session.board(), engine_best.as_deref());
            Ok((mv, NEUTRAL_SCORE))
        }
    }
}
