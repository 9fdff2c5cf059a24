use clap::Parser;
use log::error;
use stagehand::{execute, StagehandArgs};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start = Instant::now();
    let args = StagehandArgs::parse();
    if let Err(e) = args.logging().init_root_logger() {
        eprintln!("couldn't set as global logger: {}", e);
        return ExitCode::FAILURE;
    }

    match execute(&args) {
        Ok(report) => {
            print!("{}", report);
            println!();
            println!("STAGING SUCCEEDED in {:.2?}", start.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            println!();
            println!("STAGING FAILED in {:.2?}", start.elapsed());
            ExitCode::FAILURE
        }
    }
}
