//! Serve command handler
//!
//! The server itself is started from main; this handler covers `--dry-run`.

use crate::config::{Settings, StorageBackend};
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate configuration and report what a real start would do
    pub fn dry_run(&self) -> AppResult<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match self.config.storage.backend {
            StorageBackend::Postgres => {
                println!("✓ Storage backend: postgres");
                if self.config.database.auto_migrate {
                    println!("✓ Pending migrations would be applied at startup");
                }
            }
            StorageBackend::Memory => {
                println!("✓ Storage backend: memory (records are lost on exit)");
            }
        }
        println!("✓ Log level: {}", self.config.logger.level);

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/arena_users".to_string();
        config
    }

    #[test]
    fn test_serve_handler_new() {
        let config = create_valid_config();
        let handler = ServeCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[test]
    fn test_dry_run_valid_config() {
        let handler = ServeCommandHandler::new(create_valid_config());
        assert!(handler.dry_run().is_ok());
    }

    #[test]
    fn test_dry_run_invalid_config() {
        let mut config = create_valid_config();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);
        assert!(handler.dry_run().is_err());
    }

    #[test]
    fn test_dry_run_memory_backend_needs_no_database() {
        let mut config = Settings::default();
        config.storage.backend = StorageBackend::Memory;
        let handler = ServeCommandHandler::new(config);
        assert!(handler.dry_run().is_ok());
    }
}
