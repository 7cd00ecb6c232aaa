//! Aggro proxy core: session state, configuration, wrapped-engine gateway and
//! attacking-first candidate selection.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod gateway;
pub mod limits;
pub mod notation;
pub mod selector;
pub mod session;

pub use config::{EngineConfig, ProxyOption};
pub use error::{ConfigError, EvalError, GatewayError, PositionError, ProxyError, ProxyResult};
pub use evaluator::{AttackingEvaluator, GameRecord, HeuristicEvaluator, Outcome};
pub use gateway::{
    CandidateLine, EngineGateway, EngineId, EngineLauncher, ProcessLauncher, Score, SearchReport,
};
pub use limits::SearchLimit;
pub use selector::{select, ScoredCandidate, Selection};
pub use session::{Session, StartSpec};
