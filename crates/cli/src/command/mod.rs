pub mod domain;
mod services;

pub use domain::{CommandRequest, CommandResponse, ResponseMeta};

use crate::config::EngineConfig;
use services::Services;
use std::path::PathBuf;
use std::time::Instant;

pub struct CommandHandler {
    services: Services,
    config_path: Option<PathBuf>,
}

impl CommandHandler {
    pub fn new(config: EngineConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            services: Services::new(config),
            config_path,
        }
    }

    pub fn execute(&self, request: CommandRequest) -> CommandResponse {
        let started = Instant::now();
        let CommandRequest { action, payload } = request;
        log::debug!("Executing {}", action.as_str());

        let outcome = self.services.route(action, payload);
        let meta = ResponseMeta {
            action: Some(action.as_str()),
            config_path: self
                .config_path
                .as_ref()
                .map(|path| path.display().to_string()),
            duration_ms: Some(started.elapsed().as_millis() as u64),
        };

        match outcome {
            Ok(data) => CommandResponse::ok(data, meta),
            Err(err) => {
                log::warn!("{} failed: {err:#}", action.as_str());
                CommandResponse::error(&err, meta)
            }
        }
    }
}
