use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use toml_edit::ser::to_string_pretty;
use tracing::{event, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use z3::{Config, Context};

use holepunch::config::grammar::GrammarConfig;
use holepunch::config::solver::SolverConfig;
use holepunch::config::HolepunchConfig;
use holepunch::examples::Example;
use holepunch::grammar::Operator;
use holepunch::synthesis::SynthesisResult;

#[derive(Debug, Clone, Subcommand)]
pub enum HolepunchCommands {
    /// Write a sample config for the reference scenario
    New { config: Option<PathBuf> },
    /// Synthesize a program from a config file
    Synth { config: PathBuf },
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct HolepunchParams {
    #[command(subcommand)]
    command: HolepunchCommands,
}

fn main() {
    let params = HolepunchParams::parse();
    match params.command {
        HolepunchCommands::New { config } => {
            new(config.unwrap_or(PathBuf::from("./holepunch.toml"))).unwrap()
        }
        HolepunchCommands::Synth { config } => synthesize(config).unwrap(),
    }
}

fn new(path: PathBuf) -> anyhow::Result<()> {
    let config = HolepunchConfig {
        meta: Default::default(),
        examples: vec![
            Example::new(vec![20, 450], false),
            Example::new(vec![30, 1200], false),
            Example::new(vec![70, 4], true),
            Example::new(vec![72, 9], true),
            Example::new(vec![9, 4], false),
            Example::new(vec![72, 200], false),
        ],
        grammar: GrammarConfig {
            parameters: vec!["flour".to_string(), "water".to_string()],
            max_depth: 2,
            operators: vec![Operator::Lt, Operator::Gt, Operator::And],
        },
        solver: SolverConfig {
            timeout_ms: Some(10_000),
        },
        synthesis: Default::default(),
    };
    fs::write(path, to_string_pretty(&config)?)?;
    Ok(())
}

fn synthesize(config: PathBuf) -> anyhow::Result<()> {
    let p = HolepunchConfig::from_file(&config)?;
    let level = Level::from(p.meta.log_level);
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .from_env()?
        .add_directive(format!("holepunch={level}").parse()?);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
    let params = p.resolve()?;
    let cfg = Config::new();
    let z3 = Context::new(&cfg);
    let mut synthesis = params.build(&z3)?;
    let result = match params.deepening {
        true => synthesis.decide_shallowest(),
        false => synthesis.decide(),
    };
    match result {
        Ok(res) => match res {
            SynthesisResult::Solved(program) => {
                event!(Level::INFO, "Synthesis successful :)");
                println!(
                    "{} {}",
                    "solved:".green().bold(),
                    program.display(synthesis.parameters())
                );
            }
            SynthesisResult::Unsat => {
                event!(Level::INFO, "Synthesis exhausted the grammar");
                println!(
                    "{}",
                    "unsat: no program in this grammar fits the examples".red()
                );
            }
        },
        Err(e) => {
            event!(Level::ERROR, "Synthesis error: {}", e)
        }
    }
    Ok(())
}
