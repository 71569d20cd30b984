use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use storyscript::compiler::CompilationState;
use storyscript::lexer::Token;

#[derive(Parser)]
#[command(name = "storyscript")]
#[command(author, version, about = "The Storyscript lexer front end", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// One token per line (default)
    #[value(name = "simple")]
    Simple,
    /// Pretty-printed JSON array
    #[value(name = "json")]
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the token stream of a Storyscript source file
    Lex {
        /// The source file to tokenize
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "simple")]
        format: OutputFormat,

        /// Skip indentation processing (no INDENT/DEDENT/EOF)
        #[arg(long)]
        raw: bool,
    },

    /// Check a Storyscript source file for lexical errors
    Check {
        /// The source file to check
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logger before parsing CLI args
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let result = match cli.command {
        Commands::Lex { input, format, raw } => lex(input, format, raw),
        Commands::Check { input } => check(input),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the lexer, reporting diagnostics on failure
fn run_lexer(state: &mut CompilationState, raw: bool) -> Result<Vec<Token>> {
    let tokens = if raw { state.scan() } else { state.tokenize() };
    match tokens {
        Some(tokens) => Ok(tokens),
        None => {
            state.report_diagnostics()?;
            anyhow::bail!("Lexical analysis failed");
        }
    }
}

fn lex(input: PathBuf, format: OutputFormat, raw: bool) -> Result<()> {
    log::info!("Tokenizing {:?}", input);

    let mut state = CompilationState::new(&input)?;
    let tokens = run_lexer(&mut state, raw)?;

    match format {
        OutputFormat::Simple => {
            for token in &tokens {
                let value = token.value.to_string();
                println!("{:>4} {:<20} {}", token.line, token.kind.name(), value);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&tokens)
                .context("Failed to serialize tokens")?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn check(input: PathBuf) -> Result<()> {
    log::info!("Checking {:?}", input);

    let mut state = CompilationState::new(&input)?;
    let tokens = run_lexer(&mut state, false)?;
    log::debug!("{} tokens", tokens.len());

    println!("{}: No errors found", "success".green().bold());
    Ok(())
}
