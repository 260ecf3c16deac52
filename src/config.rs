use crate::cli::{Args, ColorChoice};

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            seed: args.seed,
        }
    }
}
