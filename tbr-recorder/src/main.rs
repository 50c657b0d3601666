//! `tbr` binary entry point.

use std::process::ExitCode;

use clap::Parser;

use tbr_capture::{FilterSpec, PcapSource};
use tbr_clock::SystemClock;
use tbr_fs::RealFilesystem;

use tbr_recorder::exit;
use tbr_recorder::logger::{Logger, StderrLogger, Verbosity};
use tbr_recorder::recorder::{run_recorder, CommandError, RecorderReport};
use tbr_recorder::signal::ShutdownFlag;
use tbr_recorder::Cli;

fn run(cli: &Cli, logger: &StderrLogger) -> Result<RecorderReport, CommandError> {
    cli.validate()?;
    let config = cli.recorder_config();

    // Open the capture before the log: a fatal capture startup error must
    // not leave a baseline file behind
    let filter = FilterSpec::new(config.target, config.port);
    logger.verbose(&format!("capture filter: {}", filter.expression()));

    let source =
        PcapSource::open(&filter, cli.iface.as_deref()).map_err(CommandError::CaptureStart)?;

    let shutdown = ShutdownFlag::new();
    run_recorder(
        &config,
        source,
        &SystemClock,
        RealFilesystem,
        &shutdown,
        logger,
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logger = StderrLogger::new(Verbosity::from_count(cli.verbose));

    match run(&cli, &logger) {
        Ok(report) => {
            logger.info(&format!(
                "done: {} events in {} windows written to {} ({} dropped, {} unflushed)",
                report.events,
                report.windows_written,
                cli.log_path.display(),
                report.windows_dropped,
                report.windows_unflushed
            ));
            ExitCode::from(exit::SUCCESS)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(exit::exit_code(&e))
        }
    }
}
