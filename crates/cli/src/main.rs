use std::process::ExitCode;

fn main() -> ExitCode {
    sellerbot_cli::run()
}
