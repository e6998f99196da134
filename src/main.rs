// gitrefs: branch, tag and tracked-ref queries over the git CLI
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Settings --> Logging --> Command Dispatch
//!   query (RepoContext::discover) | options | config-files
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use gitrefs::cli::global::GlobalOptions;
use gitrefs::cli::{self, Command};
use gitrefs::cmd::config::{run_config_files_command, run_options_command};
use gitrefs::cmd::query::run_query;
use gitrefs::config::Settings;
use gitrefs::config::loader::SettingsLoader;
use gitrefs::error::Result;
use gitrefs::git::context::RepoContext;
use gitrefs::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_SETTINGS_FILE: &str = "gitrefs.toml";
const ENV_PREFIX: &str = "GITREFS";

fn main() -> ExitCode {
    let cli = cli::parse();

    if cli.command == Command::ConfigFiles {
        run_config_files_command(&build_settings_loader(&cli.global).format_loaded_files());
        return ExitCode::SUCCESS;
    }

    let settings = match load_settings(&cli.global) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = LogConfig::builder()
        .with_console_level(settings.log.level)
        .maybe_with_log_file(settings.log.file.clone())
        .build();
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match dispatch_command(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn dispatch_command(cli: &cli::Cli, settings: &Settings) -> Result<()> {
    if cli.command == Command::Options {
        run_options_command(settings);
        return Ok(());
    }

    let start = cli.global.repo.clone().unwrap_or_else(|| PathBuf::from("."));
    let ctx = RepoContext::discover(&start, settings.runner()?, settings.git.env.clone())?;
    tracing::debug!(workdir = %ctx.workdir().display(), command = ?cli.command, "running query");

    if let Some(output) = run_query(&cli.command, &ctx)? {
        print!("{}", output.render(settings.output.format)?);
    }
    Ok(())
}

fn build_settings_loader(global: &GlobalOptions) -> SettingsLoader {
    let mut loader = SettingsLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(DEFAULT_SETTINGS_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_settings(global: &GlobalOptions) -> Result<Settings> {
    let mut loader = build_settings_loader(global);
    for (key, value) in global.to_overrides() {
        loader = loader.set(key, value)?;
    }
    loader.build()
}
