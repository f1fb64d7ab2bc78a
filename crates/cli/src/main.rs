use std::process::ExitCode;

fn main() -> ExitCode {
    sashquote_cli::run()
}
