use std::process::ExitCode;

mod cli;
mod commands;
mod config;
mod display;
mod io;

fn main() -> ExitCode {
    let cli = cli::parse();
    let quiet = cli.command.quiet();
    display::init_logging(cli.verbose, quiet);

    let ctx = display::Context::detect().with_quiet(quiet);

    if ctx.interactive {
        display::print_banner();
    }

    match commands::dispatch(cli.command, ctx) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
