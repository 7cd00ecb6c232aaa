//! UCI protocol command parser

use std::str::FromStr;

use aggro_core::error::{ProxyError, ProxyResult};
use log::{debug, warn};

use super::commands::{GoParams, UciCommand};

fn parse_error(msg: impl Into<String>) -> ProxyError {
    ProxyError::Parse(msg.into())
}

/// Parse one command line. The command word is matched case-insensitively.
pub fn parse_uci_command(line: &str) -> ProxyResult<UciCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Err(parse_error("Empty command"));
    }

    match parts[0].to_ascii_lowercase().as_str() {
        "uci" => Ok(UciCommand::Uci),
        "debug" => Ok(UciCommand::Debug),
        "isready" => Ok(UciCommand::IsReady),
        "register" => Ok(UciCommand::Register),
        "ucinewgame" => Ok(UciCommand::UciNewGame),
        "stop" => Ok(UciCommand::Stop),
        "ponderhit" => Ok(UciCommand::PonderHit),
        "quit" => Ok(UciCommand::Quit),

        "setoption" => parse_setoption(&parts[1..]),
        "position" => parse_position(&parts[1..]),
        "go" => Ok(UciCommand::Go(parse_go(&parts[1..]))),

        _ => Err(parse_error(format!("Unknown command: {}", parts[0]))),
    }
}

fn is_keyword(token: &str, keyword: &str) -> bool {
    token.eq_ignore_ascii_case(keyword)
}

/// Parse setoption command
fn parse_setoption(parts: &[&str]) -> ProxyResult<UciCommand> {
    // Expected format: name <name> [value <value>]
    if parts.len() < 2 || !is_keyword(parts[0], "name") {
        return Err(parse_error("Invalid setoption format, expected: setoption name <N> [value <V>]"));
    }

    let value_pos = parts.iter().position(|p| is_keyword(p, "value"));
    let name = match value_pos {
        Some(pos) => parts[1..pos].join(" "),
        None => parts[1..].join(" "),
    };
    if name.is_empty() {
        return Err(parse_error("setoption: missing option name"));
    }

    // "value" の後ろが空なら None 扱い
    let value = value_pos
        .map(|pos| parts[pos + 1..].join(" "))
        .filter(|v| !v.is_empty());

    Ok(UciCommand::SetOption { name, value })
}

/// Parse position command
fn parse_position(parts: &[&str]) -> ProxyResult<UciCommand> {
    let Some(first) = parts.first() else {
        return Err(parse_error("Invalid position format"));
    };
    let moves_pos = parts.iter().position(|p| is_keyword(p, "moves"));

    let fen = if is_keyword(first, "startpos") {
        if moves_pos.is_some_and(|pos| pos != 1) || (moves_pos.is_none() && parts.len() > 1) {
            return Err(parse_error("Unexpected tokens after startpos"));
        }
        None
    } else if is_keyword(first, "fen") {
        let fen_end = moves_pos.unwrap_or(parts.len());
        if fen_end <= 1 {
            return Err(parse_error("position fen: missing board description"));
        }
        Some(parts[1..fen_end].join(" "))
    } else {
        return Err(parse_error("Position must start with 'startpos' or 'fen'"));
    };

    // `moves` に続く手が無くても受け付ける
    let moves = moves_pos
        .map(|pos| parts[pos + 1..].iter().map(|s| s.to_string()).collect())
        .unwrap_or_default();

    Ok(UciCommand::Position { fen, moves })
}

/// Parse the value following a go parameter.
///
/// A value that does not parse is ignored and left for the main loop, so
/// `go depth movetime 500` still picks up the movetime.
fn take_value<T: FromStr>(parts: &[&str], i: &mut usize) -> Option<T> {
    let key = parts[*i];
    match parts.get(*i + 1) {
        Some(raw) => match raw.parse::<T>() {
            Ok(v) => {
                *i += 1;
                Some(v)
            }
            Err(_) => {
                warn!("Invalid go {key} value: {raw}, ignored");
                None
            }
        },
        None => {
            warn!("go {key} requires a value");
            None
        }
    }
}

/// Parse go command. Never fails: bad or unknown parameters are skipped.
fn parse_go(parts: &[&str]) -> GoParams {
    let mut params = GoParams::default();
    let mut i = 0;

    while i < parts.len() {
        match parts[i].to_ascii_lowercase().as_str() {
            "infinite" => params.infinite = true,
            "ponder" => params.ponder = true,
            "wtime" => params.wtime = take_value(parts, &mut i).or(params.wtime),
            "btime" => params.btime = take_value(parts, &mut i).or(params.btime),
            "winc" => params.winc = take_value(parts, &mut i).or(params.winc),
            "binc" => params.binc = take_value(parts, &mut i).or(params.binc),
            "movestogo" => params.moves_to_go = take_value(parts, &mut i).or(params.moves_to_go),
            "depth" => params.depth = take_value(parts, &mut i).or(params.depth),
            "nodes" => params.nodes = take_value(parts, &mut i).or(params.nodes),
            "movetime" => params.movetime = take_value(parts, &mut i).or(params.movetime),
            other => debug!("Unknown go parameter: {other}"),
        }
        i += 1;
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_uci_command("uci").unwrap(), UciCommand::Uci);
        assert_eq!(parse_uci_command("isready").unwrap(), UciCommand::IsReady);
        assert_eq!(parse_uci_command("ucinewgame").unwrap(), UciCommand::UciNewGame);
        assert_eq!(parse_uci_command("stop").unwrap(), UciCommand::Stop);
        assert_eq!(parse_uci_command("ponderhit").unwrap(), UciCommand::PonderHit);
        assert_eq!(parse_uci_command("quit").unwrap(), UciCommand::Quit);
        assert_eq!(parse_uci_command("debug on").unwrap(), UciCommand::Debug);
        assert_eq!(parse_uci_command("register later").unwrap(), UciCommand::Register);
    }

    #[test]
    fn test_command_word_is_case_insensitive() {
        assert_eq!(parse_uci_command("UCI").unwrap(), UciCommand::Uci);
        assert_eq!(parse_uci_command("  IsReady  ").unwrap(), UciCommand::IsReady);
        assert_eq!(
            parse_uci_command("Position StartPos").unwrap(),
            UciCommand::Position { fen: None, moves: vec![] }
        );
    }

    #[test]
    fn test_parse_unknown_and_empty() {
        assert!(matches!(parse_uci_command("usi"), Err(ProxyError::Parse(_))));
        assert!(matches!(parse_uci_command("   "), Err(ProxyError::Parse(_))));
    }

    #[test]
    fn test_parse_setoption() {
        assert_eq!(
            parse_uci_command("setoption name MultiPV value 3").unwrap(),
            UciCommand::SetOption { name: "MultiPV".to_string(), value: Some("3".to_string()) }
        );
        // 値にスペースを含むパス
        assert_eq!(
            parse_uci_command("setoption name EnginePath value /opt/My Engines/sf").unwrap(),
            UciCommand::SetOption {
                name: "EnginePath".to_string(),
                value: Some("/opt/My Engines/sf".to_string()),
            }
        );
        assert_eq!(
            parse_uci_command("setoption name Clear Hash").unwrap(),
            UciCommand::SetOption { name: "Clear Hash".to_string(), value: None }
        );
        assert_eq!(
            parse_uci_command("setoption name Hash value").unwrap(),
            UciCommand::SetOption { name: "Hash".to_string(), value: None }
        );
    }

    #[test]
    fn test_parse_setoption_malformed() {
        assert!(parse_uci_command("setoption").is_err());
        assert!(parse_uci_command("setoption MultiPV 3").is_err());
        assert!(parse_uci_command("setoption name value 3").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(
            parse_uci_command("position startpos moves e2e4 e7e5").unwrap(),
            UciCommand::Position {
                fen: None,
                moves: vec!["e2e4".to_string(), "e7e5".to_string()],
            }
        );
        assert_eq!(
            parse_uci_command("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4").unwrap(),
            UciCommand::Position {
                fen: Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".to_string()),
                moves: vec!["e2e4".to_string()],
            }
        );
        assert_eq!(
            parse_uci_command("position startpos moves").unwrap(),
            UciCommand::Position { fen: None, moves: vec![] }
        );
    }

    #[test]
    fn test_parse_position_malformed() {
        assert!(parse_uci_command("position").is_err());
        assert!(parse_uci_command("position fen").is_err());
        assert!(parse_uci_command("position fen moves e2e4").is_err());
        assert!(parse_uci_command("position somewhere").is_err());
        assert!(parse_uci_command("position startpos e2e4").is_err());
    }

    #[test]
    fn test_parse_go() {
        let cmd = parse_uci_command(
            "go wtime 60000 btime 59000 winc 1000 binc 1000 movestogo 30",
        )
        .unwrap();
        let UciCommand::Go(params) = cmd else {
            panic!("expected go");
        };
        assert_eq!(params.wtime, Some(60000));
        assert_eq!(params.btime, Some(59000));
        assert_eq!(params.winc, Some(1000));
        assert_eq!(params.binc, Some(1000));
        assert_eq!(params.moves_to_go, Some(30));
        assert_eq!(params.depth, None);

        let UciCommand::Go(params) = parse_uci_command("go depth 12 nodes 50000 movetime 250").unwrap()
        else {
            panic!("expected go");
        };
        assert_eq!(params.depth, Some(12));
        assert_eq!(params.nodes, Some(50000));
        assert_eq!(params.movetime, Some(250));
    }

    #[test]
    fn test_parse_go_is_lenient() {
        let UciCommand::Go(params) =
            parse_uci_command("go depth deep movetime 500 searchmoves e2e4 infinite mate").unwrap()
        else {
            panic!("expected go");
        };
        assert_eq!(params.depth, None);
        assert_eq!(params.movetime, Some(500));
        assert!(params.infinite);

        assert_eq!(parse_uci_command("go").unwrap(), UciCommand::Go(GoParams::default()));
        assert_eq!(
            parse_uci_command("go depth").unwrap(),
            UciCommand::Go(GoParams::default())
        );
    }
}
