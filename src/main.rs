use std::process::ExitCode;

use env_logger::Builder;
use log::LevelFilter;

fn main() -> ExitCode {
    Builder::new()
        .format_timestamp_millis()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    match daily_metrics::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
