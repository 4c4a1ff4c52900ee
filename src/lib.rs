pub mod app;
pub mod clipboard;
mod config;
pub mod error;
pub mod geometry;
pub mod glass;
pub mod logging;
pub mod preview;
pub mod session;
pub mod settings;
pub mod theme;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting frosted v{}", env!("CARGO_PKG_VERSION"));

    let app = app::App::new();
    app.start()?;

    tracing::info!("frosted exited cleanly");
    Ok(())
}
