//! Search limits handed to the wrapped engine.

use crate::config::EngineConfig;

/// How long / deep the wrapped engine should search. Built per `go`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimit {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    /// Fixed time per move in milliseconds
    pub movetime_ms: Option<u64>,
    pub wtime_ms: Option<u64>,
    pub btime_ms: Option<u64>,
    pub winc_ms: Option<u64>,
    pub binc_ms: Option<u64>,
    pub movestogo: Option<u32>,
}

impl SearchLimit {
    /// True when no field constrains the search
    pub fn is_unbounded(&self) -> bool {
        self.depth.is_none()
            && self.nodes.is_none()
            && self.movetime_ms.is_none()
            && self.wtime_ms.is_none()
            && self.btime_ms.is_none()
    }

    /// Fill an unbounded limit from the configured defaults.
    ///
    /// A limit that already constrains the search is kept as sent by the GUI;
    /// mixing a default movetime into a clock-based limit would override the
    /// engine's own time management.
    pub fn or_defaults(self, config: &EngineConfig) -> Self {
        if !self.is_unbounded() {
            return self;
        }
        Self {
            depth: config.default_depth,
            movetime_ms: config.default_movetime_ms,
            ..self
        }
    }

    /// Arguments of the `go` command for this limit
    pub fn to_go_args(&self) -> String {
        let mut parts = Vec::new();
        if let Some(v) = self.wtime_ms {
            parts.push(format!("wtime {v}"));
        }
        if let Some(v) = self.btime_ms {
            parts.push(format!("btime {v}"));
        }
        if let Some(v) = self.winc_ms {
            parts.push(format!("winc {v}"));
        }
        if let Some(v) = self.binc_ms {
            parts.push(format!("binc {v}"));
        }
        if let Some(v) = self.movestogo {
            parts.push(format!("movestogo {v}"));
        }
        if let Some(v) = self.depth {
            parts.push(format!("depth {v}"));
        }
        if let Some(v) = self.nodes {
            parts.push(format!("nodes {v}"));
        }
        if let Some(v) = self.movetime_ms {
            parts.push(format!("movetime {v}"));
        }
        parts.join(" ")
    }
}
