//! Migrate command handler
//!
//! Applies, previews or reverts the embedded schema migrations.

use crate::config::{Settings, StorageBackend};
use crate::db;
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command
    ///
    /// # Arguments
    /// * `dry_run` - List pending migrations without applying them
    /// * `rollback` - Number of most recent migrations to revert
    ///
    /// # Errors
    /// - `BadRequest` when the storage backend is not postgres
    /// - Configuration errors for an invalid database section
    /// - Database errors from the migration harness
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.ensure_postgres()?;
        self.config.database.validate()?;

        let url = self.config.database.url.as_str();
        if dry_run {
            println!("Checking for pending migrations...");
            let pending = db::pending_migrations(url).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {}", name);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
        } else if let Some(steps) = rollback {
            println!("Rolling back {} migration(s)...", steps);
            let reverted = db::revert_migrations(url, steps).await?;
            if reverted.is_empty() {
                println!("✓ Nothing to roll back - no migrations are applied");
            } else {
                println!("✓ Rolled back {} migration(s):", reverted.len());
                for version in &reverted {
                    println!("  - {}", version);
                }
            }
        } else {
            println!("Running database migrations...");
            let applied = db::run_pending_migrations(url).await?;
            if applied.is_empty() {
                println!("✓ No migrations to apply - database is already up to date");
            } else {
                println!("✓ Applied {} migration(s):", applied.len());
                for version in &applied {
                    println!("  - {}", version);
                }
            }
        }

        Ok(())
    }

    fn ensure_postgres(&self) -> AppResult<()> {
        match self.config.storage.backend {
            StorageBackend::Postgres => Ok(()),
            other => Err(AppError::BadRequest {
                message: format!(
                    "Migrations require the postgres storage backend, but '{}' is configured",
                    other
                ),
            }),
        }
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
