//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{Environment, StorageBackend};

/// User records service for the arena
#[derive(Parser, Debug)]
#[command(name = "arena-users")]
#[command(about = "User records service: lookup, creation, partial update and deletion over HTTP")]
#[command(long_about = "
arena-users serves user records (email, username, rating, tier, match
statistics, avatar) over a JSON HTTP API under /api/users.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    arena-users serve

    # Bind to all interfaces on a custom port
    arena-users serve --host 0.0.0.0 --port 9000

    # Run without a database; records live in process memory
    arena-users serve --storage memory

    # Use a single configuration file
    arena-users --config /etc/arena-users/production.toml serve

    # Check configuration without starting the server
    arena-users serve --dry-run

    # Apply, preview or roll back database migrations
    arena-users migrate
    arena-users migrate --dry-run
    arena-users migrate --rollback 1
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Load exactly this TOML file instead of the layered files in the
    /// configuration directory. `ARENA_*` environment variables still apply.
    #[arg(short, long, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Override environment detection (`ARENA_APP_ENV`)
    ///
    /// Selects which `{environment}.toml` overlay is loaded.
    #[arg(short, long, value_enum)]
    pub env: Option<EnvironmentArg>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port number to listen on (default: 8090)
        #[arg(short, long, value_name = "PORT", value_parser = clap::value_parser!(u16).range(1..))]
        port: Option<u16>,

        /// Log level override; wins over --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Storage backend override
        #[arg(long, value_enum)]
        storage: Option<StorageArg>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Database migration operations
    ///
    /// Requires the postgres storage backend.
    Migrate {
        /// Show pending migrations without applying
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Number of most recent migrations to revert (1-100)
        #[arg(long, value_name = "STEPS", value_parser = clap::value_parser!(u32).range(1..=100))]
        rollback: Option<u32>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            host: None,
            port: None,
            log_level: None,
            storage: None,
            dry_run: false,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvironmentArg {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageArg {
    #[value(alias = "postgresql", alias = "pg")]
    Postgres,
    Memory,
}

impl Cli {
    /// The subcommand to run; `serve` when none was given.
    pub fn selected_command(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    /// Environment from `--env`, falling back to `ARENA_APP_ENV`.
    pub fn environment(&self) -> Environment {
        self.env.map(Environment::from).unwrap_or_else(Environment::from_env)
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<EnvironmentArg> for Environment {
    fn from(env: EnvironmentArg) -> Self {
        match env {
            EnvironmentArg::Development => Environment::Development,
            EnvironmentArg::Test => Environment::Test,
            EnvironmentArg::Staging => Environment::Staging,
            EnvironmentArg::Production => Environment::Production,
        }
    }
}

impl From<StorageArg> for StorageBackend {
    fn from(storage: StorageArg) -> Self {
        match storage {
            StorageArg::Postgres => StorageBackend::Postgres,
            StorageArg::Memory => StorageBackend::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["arena-users", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["arena-users"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.selected_command(), Commands::default());
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "arena-users",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--storage",
            "memory",
        ])
        .unwrap();

        assert_eq!(
            cli.selected_command(),
            Commands::Serve {
                host: Some("0.0.0.0".to_string()),
                port: Some(9000),
                log_level: None,
                storage: Some(StorageArg::Memory),
                dry_run: false,
            }
        );
    }

    #[test]
    fn test_port_zero_rejected() {
        assert!(Cli::try_parse_from(["arena-users", "serve", "--port", "0"]).is_err());
    }

    #[test]
    fn test_migrate_rollback_bounds() {
        let cli = Cli::try_parse_from(["arena-users", "migrate", "--rollback", "2"]).unwrap();
        assert_eq!(
            cli.selected_command(),
            Commands::Migrate {
                dry_run: false,
                rollback: Some(2)
            }
        );
        assert!(Cli::try_parse_from(["arena-users", "migrate", "--rollback", "0"]).is_err());
        assert!(Cli::try_parse_from(["arena-users", "migrate", "--rollback", "101"]).is_err());
    }

    #[test]
    fn test_migrate_dry_run_conflicts_with_rollback() {
        let err = Cli::try_parse_from(["arena-users", "migrate", "--dry-run", "--rollback", "1"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["arena-users", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_env_flag_maps_to_environment() {
        let cli = Cli::try_parse_from(["arena-users", "--env", "prod"]).unwrap();
        assert_eq!(cli.environment(), Environment::Production);
    }
}
