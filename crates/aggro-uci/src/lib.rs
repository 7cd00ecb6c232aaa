//! UCI front end for the Aggro proxy

pub mod command_handler;
pub mod dispatcher;
pub mod handlers;
pub mod helpers;
pub mod state;
pub mod uci;

pub use dispatcher::Dispatcher;
