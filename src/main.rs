use clap::Parser;
use owo_colors::OwoColorize;
use std::io::{self, Read};
use std::path::Path;

use wisp::cli::{generate_completions, Args, Commands};
use wisp::config::AppConfig;
use wisp::interpreter::{self, Evaluator};

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting wisp");

    let source = match read_source(&args, &config) {
        Ok(s) => s,
        Err(e) => {
            error_message(&config, &e);
            std::process::exit(1);
        }
    };

    let program = match interpreter::parse_program(&source) {
        Ok(program) => program,
        Err(e) => {
            error_message(&config, &e.to_string());
            std::process::exit(65);
        }
    };

    verbose_log(
        &config,
        &format!("Parsed {} top-level forms", program.len()),
    );

    let mut evaluator = Evaluator::new();
    evaluator.reseed(config.seed.unwrap_or_else(rand::random));

    match evaluator.run(&program) {
        Ok(Some(value)) => println!("{}", value),
        Ok(None) => {}
        Err(e) => {
            error_message(&config, &e.to_string());
            std::process::exit(65);
        }
    }
}

fn read_source(args: &Args, config: &AppConfig) -> Result<String, String> {
    if let Some(script) = &args.script {
        verbose_log(
            config,
            &format!("Reading program from file: {}", script.display()),
        );
        read_file(script)
    } else if let Some(source) = &args.eval {
        verbose_log(config, "Using program from command-line argument");
        Ok(source.clone())
    } else {
        verbose_log(config, "Reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[wisp:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
