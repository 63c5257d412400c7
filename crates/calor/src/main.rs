use std::process::ExitCode;

fn main() -> ExitCode {
    calor::cli::main(std::env::args().skip(1))
}
