use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wisp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for a small Scheme dialect", long_about = None)]
pub struct Args {
    /// Script to run; reads the program from stdin when absent
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    #[arg(short = 'e', long = "eval", value_name = "EXPR", conflicts_with = "script")]
    pub eval: Option<String>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Seed for the `random` builtin (defaults to entropy)
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}
