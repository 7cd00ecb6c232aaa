//! UCI protocol output formatting

use std::fmt;
use std::io::{self, Write};

use aggro_core::gateway::Score;

use super::options::EngineOption;

/// Lines sent to the GUI
#[derive(Debug, Clone, PartialEq)]
pub enum UciResponse {
    IdName(String),
    IdAuthor(String),
    UciOk,
    ReadyOk,

    BestMove {
        best_move: String,
        ponder: Option<String>,
    },

    /// Search information
    Info(SearchInfo),

    Option(EngineOption),

    /// Diagnostic text, rendered as `info string ...`
    String(String),
}

/// Search information for the info command
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchInfo {
    pub depth: Option<u32>,
    pub score: Option<Score>,
    pub pv: Vec<String>,
}

impl fmt::Display for UciResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciResponse::IdName(name) => write!(f, "id name {name}"),
            UciResponse::IdAuthor(author) => write!(f, "id author {author}"),
            UciResponse::UciOk => write!(f, "uciok"),
            UciResponse::ReadyOk => write!(f, "readyok"),
            UciResponse::BestMove { best_move, ponder } => {
                write!(f, "bestmove {best_move}")?;
                if let Some(ponder_move) = ponder {
                    write!(f, " ponder {ponder_move}")?;
                }
                Ok(())
            }
            UciResponse::Info(info) => {
                let info_str = info.to_string();
                if info_str.is_empty() {
                    Ok(())
                } else {
                    write!(f, "info {info_str}")
                }
            }
            UciResponse::Option(opt) => write!(f, "{opt}"),
            UciResponse::String(msg) => write!(f, "info string {msg}"),
        }
    }
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(depth) = self.depth {
            parts.push(format!("depth {depth}"));
        }

        if let Some(score) = self.score {
            parts.push(match score {
                Score::Cp(cp) => format!("score cp {cp}"),
                Score::Mate(mate) => format!("score mate {mate}"),
            });
        }

        if !self.pv.is_empty() {
            parts.push(format!("pv {}", self.pv.join(" ")));
        }

        write!(f, "{}", parts.join(" "))
    }
}

/// Write one response line and flush; the GUI must see it immediately
pub fn send_response<W: Write + ?Sized>(out: &mut W, response: &UciResponse) -> io::Result<()> {
    let line = response.to_string();
    if line.is_empty() {
        return Ok(());
    }
    writeln!(out, "{line}")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_formatting() {
        assert_eq!(UciResponse::UciOk.to_string(), "uciok");
        assert_eq!(UciResponse::ReadyOk.to_string(), "readyok");
        assert_eq!(UciResponse::IdName("Aggro 0.1.0".into()).to_string(), "id name Aggro 0.1.0");
        assert_eq!(
            UciResponse::BestMove { best_move: "e2e4".into(), ponder: None }.to_string(),
            "bestmove e2e4"
        );
        assert_eq!(
            UciResponse::BestMove { best_move: "e2e4".into(), ponder: Some("e7e5".into()) }
                .to_string(),
            "bestmove e2e4 ponder e7e5"
        );
        assert_eq!(
            UciResponse::String("Unknown option: Foo".into()).to_string(),
            "info string Unknown option: Foo"
        );
    }

    #[test]
    fn test_search_info_formatting() {
        let info = SearchInfo {
            depth: Some(14),
            score: Some(Score::Cp(25)),
            pv: vec!["d2d4".into()],
        };
        assert_eq!(UciResponse::Info(info).to_string(), "info depth 14 score cp 25 pv d2d4");

        let info = SearchInfo { score: Some(Score::Cp(0)), ..SearchInfo::default() };
        assert_eq!(UciResponse::Info(info).to_string(), "info score cp 0");
    }

    #[test]
    fn test_empty_info_is_not_sent() {
        let mut out = Vec::new();
        send_response(&mut out, &UciResponse::Info(SearchInfo::default())).unwrap();
        assert!(out.is_empty());

        send_response(&mut out, &UciResponse::ReadyOk).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "readyok\n");
    }
}
