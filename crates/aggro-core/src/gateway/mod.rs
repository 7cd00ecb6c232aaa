//! Wrapped-engine capability.
//!
//! The dispatcher and selector only see [`EngineGateway`]; the subprocess
//! implementation lives in [`process`]. Alternate engines (or test fakes)
//! plug in through [`EngineLauncher`].

mod info;
pub mod process;

pub use info::parse_info_line;
pub use process::{ProcessLauncher, UciProcess};

use crate::error::GatewayError;
use crate::limits::SearchLimit;
use crate::session::Session;

/// Raw score as reported by the engine, from the side to move's view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns
    Cp(i32),
    /// Mate in N moves (positive = side to move mates, negative = gets mated)
    Mate(i32),
}

/// One multi-PV line of a finished search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLine {
    /// 1-based multipv index
    pub rank: u32,
    pub score: Option<Score>,
    /// Principal variation in UCI notation, starting at the searched position
    pub pv: Vec<String>,
}

/// Everything one `go` produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// Ordered by rank
    pub lines: Vec<CandidateLine>,
    /// The engine's own `bestmove`, independent of `lines`
    pub best_move: Option<String>,
}

/// Self-reported identity of the wrapped engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineId {
    pub name: String,
    pub author: String,
}

/// Handle to an initialized wrapped engine
pub trait EngineGateway {
    fn id(&self) -> &EngineId;

    /// Best-effort option forwarding
    fn configure(&mut self, name: &str, value: &str) -> Result<(), GatewayError>;

    /// Blocking search from the session's current position.
    ///
    /// Returns at most the configured number of lines; zero usable lines is a
    /// normal outcome.
    fn search(&mut self, session: &Session, limit: &SearchLimit) -> Result<SearchReport, GatewayError>;

    /// Advisory: a new game starts, drop any per-game state
    fn new_game(&mut self) -> Result<(), GatewayError>;
}

/// Creates gateways from an engine path / identifier
pub trait EngineLauncher {
    fn launch(&self, path: &str) -> Result<Box<dyn EngineGateway>, GatewayError>;
}
