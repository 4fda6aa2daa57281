//! Main application entry point.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting Smudge");

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        log::error!("Usage: smudge <scene.json>");
        return ExitCode::FAILURE;
    };

    match smudge_app::replay_file(&path) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
