use structopt::StructOpt;

use crate::{Result, config::Config};

mod server;

#[derive(StructOpt)]
struct Opts {
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Start the server
    #[structopt(name = "start")]
    Start,
}

pub fn main() -> Result<()> {
    let opts = Opts::from_args();
    let config = crate::config::load()?;

    setup_logging(&config.logging);

    // Run validation after logging setup so that it can catch bugs
    // in validation.
    config.validate()?;

    register_models(config);

    match opts.command {
        Command::Start => server::start(config),
    }
}

fn setup_logging(config: &crate::config::Logging) {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(config.level);

    if let Some(level) = config.network {
        builder.filter_module("actix_web", level);
    }

    for (module, level) in &config.filters {
        builder.filter_module(module, *level);
    }

    builder.init();
}

fn register_models(config: &'static Config) {
    let models: &'static plinth_models::Config =
        Box::leak(Box::new(plinth_models::Config {
            index: config.index.clone(),
        }));

    models.register(&config.server.domain);
}
