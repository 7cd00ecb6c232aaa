use std::collections::{BTreeMap, HashSet};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};
use log::{debug, info, trace, warn};

use super::{
    parse_info_line, CandidateLine, EngineGateway, EngineId, EngineLauncher, SearchReport,
};
use crate::error::GatewayError;
use crate::limits::SearchLimit;
use crate::session::{Session, StartSpec};

pub const ENGINE_READY_TIMEOUT: Duration = Duration::from_secs(30);
pub const ENGINE_QUIT_TIMEOUT: Duration = Duration::from_millis(300);
pub const ENGINE_QUIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Launches wrapped engines as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl EngineLauncher for ProcessLauncher {
    fn launch(&self, path: &str) -> Result<Box<dyn EngineGateway>, GatewayError> {
        Ok(Box::new(UciProcess::spawn(path)?))
    }
}

/// 子プロセスとして起動した UCI エンジン1本分の入出力。
pub struct UciProcess {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    rx: Receiver<String>,
    /// Options advertised during the handshake
    opt_names: HashSet<String>,
    id: EngineId,
    /// Last MultiPV sent; lines above it are discarded
    multipv: Option<u32>,
    label: String,
}

impl UciProcess {
    /// Spawn `path` and complete the `uci` / `isready` handshake
    pub fn spawn(path: &str) -> Result<Self, GatewayError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GatewayError::Unavailable(format!("failed to spawn {path}: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| GatewayError::Unavailable(format!("{path}: no stdin")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GatewayError::Unavailable(format!("{path}: no stdout")))?;

        let (tx, rx) = unbounded::<String>();
        std::thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(l) => {
                        if tx.send(l).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });

        let mut proc = Self {
            child,
            stdin: BufWriter::new(stdin),
            rx,
            opt_names: HashSet::new(),
            id: EngineId::default(),
            multipv: None,
            label: path.to_string(),
        };
        proc.handshake()?;
        info!("Engine ready: {} by {} ({})", proc.id.name, proc.id.author, proc.label);
        Ok(proc)
    }

    fn handshake(&mut self) -> Result<(), GatewayError> {
        self.write_line("uci")
            .map_err(|e| GatewayError::Unavailable(format!("{}: {e}", self.label)))?;
        let deadline = Instant::now() + ENGINE_READY_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let line = self.recv_line(remaining).map_err(|e| {
                GatewayError::Unavailable(format!("{}: no uciok ({e})", self.label))
            })?;
            if let Some(name) = line.strip_prefix("id name ") {
                self.id.name = name.trim().to_string();
            } else if let Some(author) = line.strip_prefix("id author ") {
                self.id.author = author.trim().to_string();
            } else if let Some(rest) = line.strip_prefix("option ") {
                if let Some(name) = parse_option_name(rest) {
                    self.opt_names.insert(name);
                }
            } else if line.trim() == "uciok" {
                break;
            }
        }
        if self.id.name.is_empty() {
            self.id.name = self.label.clone();
        }
        self.sync_ready()
            .map_err(|e| GatewayError::Unavailable(format!("{}: {e}", self.label)))
    }

    pub fn sync_ready(&mut self) -> Result<(), GatewayError> {
        self.write_line("isready")?;
        loop {
            let line = self.recv_line(ENGINE_READY_TIMEOUT)?;
            if line.trim() == "readyok" {
                return Ok(());
            }
        }
    }

    fn recv_line(&self, timeout: Duration) -> Result<String, GatewayError> {
        match self.rx.recv_timeout(timeout) {
            Ok(line) => {
                trace!("<< {line}");
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => {
                Err(GatewayError::Protocol(format!("{}: engine read timeout", self.label)))
            }
            Err(RecvTimeoutError::Disconnected) => Err(GatewayError::Disconnected),
        }
    }

    /// Wait without a deadline; the engine's own time management bounds a search
    fn recv_blocking(&self) -> Result<String, GatewayError> {
        let line = self.rx.recv().map_err(|_| GatewayError::Disconnected)?;
        trace!("<< {line}");
        Ok(line)
    }

    fn write_line(&mut self, msg: &str) -> Result<(), GatewayError> {
        trace!(">> {msg}");
        self.stdin.write_all(msg.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()?;
        Ok(())
    }
}

impl EngineGateway for UciProcess {
    fn id(&self) -> &EngineId {
        &self.id
    }

    fn configure(&mut self, name: &str, value: &str) -> Result<(), GatewayError> {
        if name.eq_ignore_ascii_case("MultiPV") {
            self.multipv = value.parse().ok();
        }
        let advertised = self.opt_names.is_empty()
            || self.opt_names.iter().any(|n| n.eq_ignore_ascii_case(name));
        if !advertised {
            debug!("{}: option {name} not advertised, skipped", self.label);
            return Ok(());
        }
        self.write_line(&format!("setoption name {name} value {value}"))
    }

    fn search(&mut self, session: &Session, limit: &SearchLimit) -> Result<SearchReport, GatewayError> {
        self.write_line(&position_command(session))?;
        let args = limit.to_go_args();
        if args.is_empty() {
            self.write_line("go")?;
        } else {
            self.write_line(&format!("go {args}"))?;
        }

        let mut lines: BTreeMap<u32, CandidateLine> = BTreeMap::new();
        loop {
            let line = self.recv_blocking()?;
            if line.starts_with("info") {
                if let Some(update) = parse_info_line(&line) {
                    merge_line(&mut lines, update);
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix("bestmove") {
                let best_move = rest
                    .split_whitespace()
                    .next()
                    .filter(|mv| *mv != "(none)" && *mv != crate::notation::NULL_MOVE)
                    .map(str::to_string);
                let cap = self.multipv.unwrap_or(u32::MAX);
                let lines: Vec<CandidateLine> =
                    lines.into_values().filter(|l| l.rank >= 1 && l.rank <= cap).collect();
                debug!("{}: bestmove {:?}, {} lines", self.label, best_move, lines.len());
                return Ok(SearchReport { lines, best_move });
            }
        }
    }

    fn new_game(&mut self) -> Result<(), GatewayError> {
        self.write_line("ucinewgame")?;
        self.sync_ready()
    }
}

impl Drop for UciProcess {
    fn drop(&mut self) {
        let _ = self.write_line("quit");
        let deadline = Instant::now() + ENGINE_QUIT_TIMEOUT;
        while Instant::now() < deadline {
            if let Ok(Some(_)) = self.child.try_wait() {
                return;
            }
            std::thread::sleep(ENGINE_QUIT_POLL_INTERVAL);
        }
        warn!("{}: engine did not quit, killing", self.label);
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Keep the latest report per multipv index; a partial update (score without
/// pv, e.g. a fail-high) keeps the previous pv
fn merge_line(lines: &mut BTreeMap<u32, CandidateLine>, update: CandidateLine) {
    match lines.get_mut(&update.rank) {
        Some(existing) => {
            if update.score.is_some() {
                existing.score = update.score;
            }
            if !update.pv.is_empty() {
                existing.pv = update.pv;
            }
        }
        None => {
            lines.insert(update.rank, update);
        }
    }
}

/// `position` command reproducing the session on the engine side
pub fn position_command(session: &Session) -> String {
    let mut cmd = match session.start() {
        StartSpec::Standard => "position startpos".to_string(),
        StartSpec::Fen(fen) => format!("position fen {fen}"),
    };
    let tokens = session.move_tokens();
    if !tokens.is_empty() {
        cmd.push_str(" moves ");
        cmd.push_str(&tokens.join(" "));
    }
    cmd
}

pub fn parse_option_name(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace().peekable();
    while let Some(tok) = tokens.next() {
        if tok == "name" {
            let mut parts = Vec::new();
            while let Some(next) = tokens.next_if(|t| *t != "type") {
                parts.push(next.to_string());
            }
            if !parts.is_empty() {
                return Some(parts.join(" "));
            }
        }
    }
    None
}
