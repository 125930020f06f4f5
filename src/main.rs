use std::process::ExitCode;

use file_consolidate::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = file_consolidate::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
