use clap::Parser;
use color_eyre::eyre;

use crate::app::App;
use crate::config::{Args, Config};

pub mod app;
pub mod buffers;
pub mod config;
pub mod logging;
pub mod results;
pub mod session;
pub mod text;
pub mod timer;
pub mod widgets;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = Config::try_from(Args::parse())?;
    let _log_guard = logging::init(&config.log_dir)?;

    let terminal = ratatui::init();
    let result = App::run(config, terminal).await;
    ratatui::restore();

    result
}
