use std::process::ExitCode;

use engine::{run_app, StartupError};
use tracing::{error, info};

use super::bootstrap::AppWiring;

pub(crate) fn run(app: Result<AppWiring, StartupError>) -> ExitCode {
    let app = match app {
        Ok(app) => app,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    let mut input = app.input;
    let summary = run_app(
        app.config,
        Box::new(app.title_scene),
        Box::new(app.game_scene),
        &mut input,
    );

    info!(
        ticks_run = summary.ticks_run,
        reason = ?summary.shutdown_reason,
        "run_complete"
    );
    ExitCode::SUCCESS
}
