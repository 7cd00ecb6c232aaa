//! Command loop: one line in, handled to completion, next line.

use std::io::{self, BufRead, ErrorKind, Write};

use aggro_core::config::EngineConfig;
use aggro_core::error::ProxyError;
use aggro_core::evaluator::AttackingEvaluator;
use aggro_core::gateway::EngineLauncher;
use aggro_core::session::Session;
use log::{debug, info, warn};

use crate::command_handler::{handle_command, report_error, CommandContext};
use crate::state::GatewayState;
use crate::uci::{parse_uci_command, UciCommand};

pub struct Dispatcher<W: Write> {
    config: EngineConfig,
    session: Session,
    gateway: GatewayState,
    launcher: Box<dyn EngineLauncher>,
    evaluator: Box<dyn AttackingEvaluator>,
    out: W,
}

impl<W: Write> Dispatcher<W> {
    /// The engine is not launched here; the first command that needs it does
    pub fn new(
        config: EngineConfig,
        launcher: Box<dyn EngineLauncher>,
        evaluator: Box<dyn AttackingEvaluator>,
        out: W,
    ) -> Self {
        Self {
            config,
            session: Session::new(),
            gateway: GatewayState::Uninitialized,
            launcher,
            evaluator,
            out,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_engine_ready(&self) -> bool {
        self.gateway.is_ready()
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Process lines until `quit` or end of input.
    ///
    /// Failed commands become `info string` diagnostics and the loop goes on;
    /// only a broken input or output stream ends it with an error.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    report_error(&mut self.out, &ProxyError::Parse(format!("unreadable input: {e}")))?;
                    continue;
                }
                Err(e) => return Err(e),
            };
            if !self.handle_line(&line)? {
                info!("quit received");
                return Ok(());
            }
        }
        debug!("end of input");
        Ok(())
    }

    /// Handle one input line; `Ok(false)` means quit
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }
        debug!("<< {line}");

        let command = match parse_uci_command(line) {
            Ok(UciCommand::Quit) => return Ok(false),
            Ok(command) => command,
            Err(e) => {
                report_error(&mut self.out, &e)?;
                return Ok(true);
            }
        };

        let mut ctx = CommandContext {
            config: &mut self.config,
            session: &mut self.session,
            gateway: &mut self.gateway,
            launcher: self.launcher.as_ref(),
            evaluator: self.evaluator.as_ref(),
            out: &mut self.out,
        };
        if let Err(e) = handle_command(command, &mut ctx) {
            report_error(&mut self.out, &e)?;
        }
        Ok(true)
    }
}

impl<W: Write> Drop for Dispatcher<W> {
    fn drop(&mut self) {
        if self.gateway.is_ready() {
            self.gateway.reset();
        }
        if let Err(e) = self.out.flush() {
            warn!("Failed to flush output: {e}");
        }
    }
}
