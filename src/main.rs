mod app;
mod model;
mod services;
mod stepper_core;
mod theme;
mod ui;
mod widgets;

use anyhow::Result;

fn main() -> Result<()> {
    services::logging::init_tracing()?;
    ui::run()
}
