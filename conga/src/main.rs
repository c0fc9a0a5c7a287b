// main.rs - Terminal front end

use std::fs::File;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use env_logger::{Builder, Env, Target};

use conga::config::{patterns_listing, rules_listing};
use conga::input::TerminalInput;
use conga::render::{TerminalGuard, TerminalRender};
use conga::{build_engine, signal, Config, Conga, EventQueue, SignalFlags, FPS};

fn init_logging(config: &Config) -> anyhow::Result<()> {
    // Records on stderr would scribble over the alternate screen, so only
    // warnings go there unless a log file is given.
    let mut builder = match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file '{}'", path.display()))?;
            let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
            builder.target(Target::Pipe(Box::new(file)));
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("warn")),
    };
    builder.init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    if config.list_rules || config.list_patterns {
        if config.list_rules {
            print!("{}", rules_listing());
        }
        if config.list_patterns {
            print!("{}", patterns_listing());
        }
        return Ok(());
    }

    config.validate()?;
    let engine = build_engine(&config).context("cannot set up the first generation")?;

    let signals = SignalFlags::new();
    signal::listen(Arc::clone(&signals)).context("cannot install signal handlers")?;

    let input = TerminalInput::new(Arc::clone(&signals));
    let queue = EventQueue::new(FPS, config.delay(), signals, input);

    let generation = {
        let _guard = TerminalGuard::enter().context("cannot prepare the terminal")?;
        let render = TerminalRender::stdout()?;
        let mut conga = Conga::new(engine, queue, render, config.stop_on_cycle);
        conga.run().await?;
        conga.engine().stats().generation
    };

    log::info!("stopped at generation {generation}");
    Ok(())
}
