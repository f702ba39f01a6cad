//! ZeroApp Builder
//!
//! Turns JSON app descriptions into Android projects, either from the command
//! line or through the HTTP API used by the web editor.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use zeroapp_cli::output::{self, Status};
use zeroapp_core::config::Config;
use zeroapp_core::error::exit_codes;
use zeroapp_telemetry::TelemetryConfig;

mod commands;
mod server;

#[derive(Parser)]
#[command(name = "zeroapp")]
#[command(about = "Turn JSON app descriptions into Android projects")]
#[command(version, propagate_version = true)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true, env = "ZEROAPP_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API and serve the web editor
    Serve {
        /// Interface to bind (default from config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default from config or PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Render and write an Android project
    Generate {
        /// Project description (JSON)
        project: PathBuf,
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Generate, sign and package a mock APK
    Build {
        /// Project description (JSON)
        project: PathBuf,
        /// Keystore password
        #[arg(long, env = "ZEROAPP_KEYSTORE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Print one screen's layout, or the manifest when no screen is given
    Render {
        /// Project description (JSON)
        project: PathBuf,
        /// Screen id
        #[arg(short, long)]
        screen: Option<String>,
    },

    /// Check the environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    output::set_quiet(cli.quiet);

    let config_path = cli.config.as_deref().map(|p| p.to_string_lossy().into_owned());
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            Status::error(&err.to_string());
            return exit(exit_codes::for_error(&err));
        }
    };

    let logging = &config.schema.logging;
    let telemetry = TelemetryConfig {
        log_level: logging.level.clone(),
        log_dir: logging.log_dir.as_ref().map(PathBuf::from),
        ansi: !cli.no_color,
        ..TelemetryConfig::default()
    }
    .with_verbosity(cli.verbose, cli.quiet);

    let _log_guard = match zeroapp_telemetry::init_with_config(telemetry) {
        Ok(guard) => guard,
        Err(err) => {
            Status::error(&format!("{:#}", err));
            return exit(exit_codes::CONFIG_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Serve { host, port } => commands::serve::run(&config, host, port),
        Commands::Generate { project, out } => commands::generate::run(&config, &project, &out),
        Commands::Build { project, password } => {
            commands::build::run(&config, &project, password.as_deref())
        }
        Commands::Render { project, screen } => {
            commands::render::run(&config, &project, screen.as_deref())
        }
        Commands::Doctor { json } => commands::doctor::run(&config, json),
    };

    match result {
        Ok(code) => exit(code),
        Err(err) => {
            Status::error(&format!("{:#}", err));
            exit(commands::exit_code(&err))
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
