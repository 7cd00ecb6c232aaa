use aggro_core::config::EngineConfig;
use aggro_core::error::GatewayError;
use aggro_core::gateway::{EngineGateway, EngineLauncher};
use log::{info, warn};

/// Lifecycle of the wrapped engine handle
#[derive(Default)]
pub enum GatewayState {
    /// No engine yet, or the last launch failed; the next command that needs
    /// one retries
    #[default]
    Uninitialized,
    Ready(Box<dyn EngineGateway>),
}

impl GatewayState {
    pub fn is_ready(&self) -> bool {
        matches!(self, GatewayState::Ready(_))
    }

    /// The running engine, without initializing one
    pub fn get_mut(&mut self) -> Option<&mut dyn EngineGateway> {
        match self {
            GatewayState::Ready(gateway) => Some(gateway.as_mut()),
            GatewayState::Uninitialized => None,
        }
    }

    /// Launch `config.engine_path` if no engine is running and push the
    /// configured settings to it.
    ///
    /// On failure the state stays `Uninitialized`.
    pub fn ensure(
        &mut self,
        config: &EngineConfig,
        launcher: &dyn EngineLauncher,
    ) -> Result<&mut dyn EngineGateway, GatewayError> {
        if let GatewayState::Uninitialized = self {
            info!("Initializing engine: {}", config.engine_path);
            let mut gateway = launcher.launch(&config.engine_path)?;
            for (name, value) in config.engine_settings() {
                // 未対応のオプションがあっても起動は続ける
                if let Err(e) = gateway.configure(name, &value) {
                    warn!("Failed to apply {name}={value}: {e}");
                }
            }
            *self = GatewayState::Ready(gateway);
        }
        match self {
            GatewayState::Ready(gateway) => Ok(gateway.as_mut()),
            GatewayState::Uninitialized => {
                Err(GatewayError::Unavailable(config.engine_path.clone()))
            }
        }
    }

    /// Drop the running engine (the handle's `Drop` shuts it down)
    pub fn reset(&mut self) {
        if let GatewayState::Ready(gateway) = std::mem::take(self) {
            info!("Releasing engine {}", gateway.id().name);
        }
    }

    /// Forget a dead engine so the next `ensure` launches a new one.
    ///
    /// Other errors leave the running engine in place.
    pub fn invalidate_on(&mut self, err: &GatewayError) {
        if err.is_connection_lost() && self.is_ready() {
            warn!("Engine connection lost ({err}), will relaunch on next use");
            self.reset();
        }
    }
}
