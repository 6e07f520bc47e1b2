mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::{bail, Result};
use clap::Parser;
use log::debug;
use shellcalc::config::{Cli, Mode, Settings};
use shellcalc::Session;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();
    let settings = Settings::from(&cli);
    debug!("starting with {:?}", cli);

    if !cli.eval.is_empty() {
        let mut session = Session::new(settings);
        if !line_mode::run_batch(&mut session, &cli.eval, &mut std::io::stdout().lock())? {
            std::process::exit(1);
        }
        return Ok(());
    }

    match cli.mode {
        Mode::Plain => line_mode::run_plain(&mut Session::new(settings)),
        #[cfg(feature = "line")]
        Mode::Line => line_mode::run_line(&mut Session::new(settings)),
        #[cfg(feature = "tui")]
        Mode::Tui => tui_mode::run_tui(settings),
        #[allow(unreachable_patterns)]
        mode => bail!("front end '{}' was not compiled into this build", mode),
    }
}
