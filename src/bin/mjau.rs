//! `mjau` command-line entry point.
//!
//! Display output goes to stdout; logs go to stderr via env_logger.

use clap::Parser;
use log::debug;
use mjau::cli::{Cli, Command};
use mjau::config::{write_sample_config, Config, ConfigError};
use mjau::executor::ReqwestTransport;
use mjau::output::ConsoleSink;
use mjau::runner::{RunError, Runner};
use mjau::variables::VariableStore;

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();
    debug!("mjau {} starting", env!("CARGO_PKG_VERSION"));

    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    if cli.command == Command::Init {
        return init(&cli);
    }

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("{}", e);
            return 1;
        }
    };

    let transport = ReqwestTransport::new(cli.execution_config());
    let mut runner = Runner::new(&config, transport, cli.runner_options());
    let mut store = VariableStore::new();
    let mut sink = ConsoleSink::stdout(cli.display_options());

    let result = match &cli.command {
        Command::Runall => runner.run_all(&mut store, &mut sink),
        command => runner.run_batch(&command.request_names(), &mut store, &mut sink),
    };

    match result {
        Ok(batch) => batch.exit_code(),
        Err(RunError::RequestNotFound(name)) => {
            println!("😿 Request {} not found", name);
            1
        }
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

fn init(cli: &Cli) -> i32 {
    println!("Initializing Mjau, creating a sample config file");
    match write_sample_config(&cli.config) {
        Ok(()) => 0,
        Err(ConfigError::AlreadyExists(_)) => {
            println!("Config file already exists");
            0
        }
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    }
}
