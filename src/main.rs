use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sim8086::{
    disassemble,
    format::{format_final_state, format_listing, format_step},
    Simulator, SimulatorConfig,
};

#[derive(Parser)]
#[command(name = "sim8086", about = "Decode and simulate 8086 machine code")]
struct Cli {
    #[command(subcommand)]
    mode: CliMode,
}

#[derive(Subcommand)]
enum CliMode {
    /// Print the program as nasm assembly
    Disasm { path: PathBuf },
    /// Run the program and print every executed instruction
    Exec {
        path: PathBuf,
        /// Stop with an error after this many instructions
        #[arg(long)]
        max_steps: Option<u64>,
    },
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    match cli.mode {
        CliMode::Disasm { path } => {
            let content = read_file(&path)?;
            let instructions = disassemble(&content)
                .with_context(|| format!("failed to decode {}", path.display()))?;
            writeln!(stdout, "{}", format_listing(&instructions))?;
        }
        CliMode::Exec { path, max_steps } => {
            let content = read_file(&path)?;
            let mut simulator = Simulator::new(content, SimulatorConfig { max_steps })
                .with_context(|| format!("cannot load {}", path.display()))?;

            let mut output = Ok(());
            let result = simulator.run_with(|step| {
                if output.is_ok() {
                    output = writeln!(stdout, "{}", format_step(step));
                }
            });
            output?;
            result.with_context(|| format!("simulation of {} failed", path.display()))?;

            writeln!(stdout, "\n{}", format_final_state(simulator.machine()))?;
        }
    }

    Ok(())
}
