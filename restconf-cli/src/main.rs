use config::CliConfig;
use env_logger::{Builder, Target};
use log::{debug, LevelFilter};
use restconf_client::error::RestconfResult;
use restconf_client::loader::ConfigLoader;
use std::process;

mod cli;
mod config;

fn init_logging(verbosity: u8) {
    let mut builder = Builder::new();
    match verbosity {
        1 => {
            builder.filter_level(LevelFilter::Warn);
            builder.filter_module("restconf_client", LevelFilter::Debug);
            builder.filter_module("restconf_client::transport::http", LevelFilter::Info)
        }
        2 => {
            builder.filter_level(LevelFilter::Warn);
            builder.filter_module("restconf_client", LevelFilter::Debug);
            builder.filter_module("restconf_loader", LevelFilter::Debug)
        }
        3 => {
            builder.filter_level(LevelFilter::Debug);
            builder.filter_module("restconf_client", LevelFilter::Debug)
        }
        _ => {
            builder.filter_level(LevelFilter::Warn);
            builder.filter_module("reqwest", LevelFilter::Off)
        }
    };
    builder.target(Target::Stdout);
    builder.init();
}

fn main() -> RestconfResult<()> {
    let args = cli::cli().get_matches();
    let cfg = CliConfig::new(&args);
    if !cfg.quiet {
        init_logging(cfg.verbosity);
    }

    if !cfg.config_file.exists() {
        println!(
            "Error: Config file not found: {}",
            cfg.config_file.display()
        );
        process::exit(1);
    }

    debug!("Loader configuration: {:?}", cfg.loader);
    let mut loader = ConfigLoader::new(cfg.loader)?;
    let success = loader.load(&cfg.config_file, &cfg.options);
    debug!("Run finished, success: {}", success);
    process::exit(if success { 0 } else { 1 });
}
