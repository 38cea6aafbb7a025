//! pngcrop command line entry point.
//!
//! Usage:
//!   pngcrop --png in.png --out crop.png [-x 200 -y 200 -w 640 -h 480] [--ssd crop.ssd]

use std::process::ExitCode;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;

use pngcrop_lib::{cli::CliError, Args, ConsoleProgress, Error, Silent};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
            e.print().ok();
            return ExitCode::SUCCESS;
        }
        Err(e) => return fail(Error::from(CliError::from(e))),
    };

    let quiet = args.quiet;
    let request = match args.into_request() {
        Ok(request) => request,
        Err(e) => return fail(e.into()),
    };
    log::debug!("Request: {:?}", request);

    let result = if quiet {
        pngcrop_lib::run(&request, &mut Silent)
    } else {
        pngcrop_lib::run(&request, &mut ConsoleProgress::stdout())
    };

    match result {
        Ok(summary) => {
            log::info!(
                "Wrote {} ({}x{}, {})",
                request.output.display(),
                summary.width,
                summary.height,
                summary.layout
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn fail(err: Error) -> ExitCode {
    match &err {
        // clap renders its own usage text.
        Error::Cli(CliError::InvalidArgument(clap_err)) => {
            clap_err.print().ok();
        }
        _ => eprintln!("{}", err),
    }
    log::debug!("Exiting with {:?}", err.kind());
    ExitCode::from(err.exit_code())
}
