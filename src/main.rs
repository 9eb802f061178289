use clap::Parser;
use classifier::cli::{Args, run_cli};
use classifier::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match run_cli(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:?}");
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::from(e.exit_code())
        }
    }
}
