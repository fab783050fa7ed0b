// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use heatcheck_app::{AppState, Route};
use heatcheck_db::Store;
use logging::LogTarget;
use runtime::{DEMO_EMAIL, DEMO_PASSWORD, ServiceRuntime};
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `heatcheck --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let _log_guard = if options.log_stderr {
        logging::init(LogTarget::Stderr)?
    } else {
        let log_dir = heatcheck_db::default_log_dir()?;
        logging::init(LogTarget::Directory(&log_dir))?
    };

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {}; if this path is wrong, set [session].db_path or HEATCHECK_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    let session = store.load_session()?;

    let start_route = match &options.route {
        Some(path) => {
            let route = Route::parse(path);
            if route.is_not_found() {
                info!(path = %path, "starting on not-found screen");
            }
            route
        }
        None => config.start_route(),
    };

    let mut runtime = if options.demo {
        ServiceRuntime::demo(store)
    } else {
        ServiceRuntime::from_config(&config, store).with_context(|| {
            format!(
                "invalid [api] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?
    };
    if options.check_only {
        return Ok(());
    }

    if options.demo {
        eprintln!("demo mode: log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
    }

    let mut state = AppState {
        route: start_route,
        ..AppState::with_session(session)
    };
    info!(route = state.route.path(), signed_in = state.is_authenticated(), "starting");
    heatcheck_tui::run_app(&mut state, &mut runtime)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    log_stderr: bool,
    route: Option<String>,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        log_stderr: false,
        route: None,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--route" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--route requires a path such as /search_page"))?;
                options.route = Some(value.as_ref().to_owned());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-path" => {
                options.print_db_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--log-stderr" => {
                options.log_stderr = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("heatcheck: NBA player stats in the terminal");
    println!("  --config <path>          Use a specific config path");
    println!("  --route <path>           Open a screen first (for example /search_page)");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved session database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Use offline demo backends (in-memory session)");
    println!("  --check                  Validate config + DB + API settings, then exit");
    println!("  --log-stderr             Write logs to stderr instead of the log directory");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, parse_cli_args};
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/heatcheck-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_db_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                log_stderr: false,
                route: None,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_values() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));

        let error = parse_cli_args(vec!["--route"], default_options_path())
            .expect_err("missing route value should fail");
        assert!(error.to_string().contains("--route requires a path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(!options.print_db_path);
        assert!(!options.demo);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_demo_and_db_path_print_flags() -> Result<()> {
        let options = parse_cli_args(vec!["--demo", "--print-path"], default_options_path())?;
        assert!(!options.print_config_path);
        assert!(options.print_db_path);
        assert!(options.demo);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_route_and_log_target() -> Result<()> {
        let options = parse_cli_args(
            vec!["--route", "/favorites", "--log-stderr"],
            default_options_path(),
        )?;
        assert_eq!(options.route.as_deref(), Some("/favorites"));
        assert!(options.log_stderr);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag() -> Result<()> {
        let options = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(options.show_help);
        Ok(())
    }
}
