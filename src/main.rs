// armorpack: Obfuscated Bundle Packer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Pack | List | Options | Inis | Version
//! ```

use std::process::ExitCode;

use armorpack::cli::global::GlobalOptions;
use armorpack::cli::{self, Command};
use armorpack::cmd::config::{run_inis_command, run_options_command};
use armorpack::cmd::list::run_list_command;
use armorpack::cmd::pack::run_pack_command;
use armorpack::config::{Config, ConfigLoader, LOCAL_CONFIG_FILE};
use armorpack::logging::init_logging;
use armorpack::logging::{LogConfig, LogLevel};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Prefix of `ARMORPACK_SECTION__KEY` overrides.
const ENV_PREFIX: &str = "ARMORPACK";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let config = load_config(&cli.global);

    let log_config = build_log_config(&cli.global, config.as_ref().ok());
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, config).await
}

fn build_log_config(global: &GlobalOptions, config: Option<&Config>) -> LogConfig {
    let console_level = global
        .log_level
        .and_then(LogLevel::from_u8)
        .or_else(|| config.map(|c| c.global.output_log_level))
        .unwrap_or(LogLevel::INFO);

    let file_level = global
        .file_log_level
        .or(global.log_level)
        .and_then(LogLevel::from_u8)
        .or_else(|| config.map(|c| c.global.file_log_level))
        .unwrap_or(console_level);

    let log_file = global
        .log_file
        .clone()
        .or_else(|| config.and_then(|c| c.global.log_file.clone()));

    LogConfig::builder()
        .with_console_level(console_level)
        .with_file_level(file_level)
        .maybe_with_log_file(log_file.map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: armorpack::error::Result<Config>) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => config.map(|config| run_options_command(&config)),
        Some(Command::Inis) => {
            let loader = build_config_loader(&cli.global);
            run_inis_command(&loader.format_loaded_files());
            Ok(())
        }
        Some(Command::List) => run_list_command(),
        Some(Command::Pack(args)) => match config {
            Ok(config) => run_pack_command(args, &config, cli.global.dry).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> armorpack::error::Result<Config> {
    build_config_loader(global)
        .set_all(&global.to_config_overrides())
        .and_then(ConfigLoader::build)
        .map_err(|e| {
            eprintln!("Failed to load config: {e}");
            e
        })
}
