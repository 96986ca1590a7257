use clap::Parser;
use issue_api::cli::commands;
use issue_api::cli::{Cli, Commands};
use issue_api::config::{self, CliOverrides};
use issue_api::logging::init_logging;
use issue_api::{IssueError, Result, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();
    let overrides = build_cli_overrides(&cli);

    if let Err(e) = run(&cli, &overrides) {
        handle_error(&e, cli.json);
    }
}

fn run(cli: &Cli, overrides: &CliOverrides) -> Result<()> {
    let config = config::load_config(overrides)?;

    if let Err(e) = init_logging(cli.verbose, cli.quiet, config.log_json) {
        eprintln!("Failed to initialize logging: {e}");
        // Don't exit, just continue without logging
    }

    match &cli.command {
        Commands::Serve(_) => commands::serve::execute(&config),
        Commands::Config => commands::config::execute(&config, cli.json),
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stderr is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &IssueError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stderr().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        eprintln!("{}", structured.to_human(true));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> CliOverrides {
    let (addr, cors) = match &cli.command {
        Commands::Serve(args) => (args.addr.clone(), args.no_cors.then_some(false)),
        Commands::Config => (None, None),
    };

    CliOverrides {
        config: cli.config_file.clone(),
        data: cli.data.clone(),
        addr,
        cors,
        log_json: cli.log_json.then_some(true),
    }
}
