//! UCI protocol command definitions

use aggro_core::limits::SearchLimit;

/// Commands accepted from the GUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    /// Enter UCI mode; identity, options, `uciok`
    Uci,

    /// `debug on|off`, ignored
    Debug,

    /// Synchronize; initializes the wrapped engine if needed
    IsReady,

    SetOption { name: String, value: Option<String> },

    /// Set position. `fen` is `None` for `startpos`.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },

    Go(GoParams),

    /// `register`, ignored
    Register,

    UciNewGame,

    /// Accepted; a search is never interruptible
    Stop,

    PonderHit,

    Quit,
}

/// Parameters for the go command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub moves_to_go: Option<u32>,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    /// Fixed time per move in milliseconds
    pub movetime: Option<u64>,

    /// Parsed but not forwarded
    pub infinite: bool,
    pub ponder: bool,
}

impl GoParams {
    /// Limit as sent by the GUI, before configuration defaults
    pub fn to_limit(&self) -> SearchLimit {
        SearchLimit {
            depth: self.depth,
            nodes: self.nodes,
            movetime_ms: self.movetime,
            wtime_ms: self.wtime,
            btime_ms: self.btime,
            winc_ms: self.winc,
            binc_ms: self.binc,
            movestogo: self.moves_to_go,
        }
    }
}
