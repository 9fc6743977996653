use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use handheld_emu::{program::Program, repair, run};

const DEFAULT_INPUT: &str = "demos/emulator.input";

#[derive(Parser)]
#[command(
    name = "handheld-emu",
    version,
    about = "Find the infinite loop in a handheld boot program and repair it"
)]
struct Cli {
    /// Program listing, one `<operation> <argument>` per line.
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Which part of the puzzle to solve.
    #[arg(short, long, value_enum, default_value_t = Part::All)]
    part: Part,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Part {
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
    All,
}

fn main() {
    env_logger::init();

    if let Err(err) = execute() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn execute() -> Result<()> {
    let cli = Cli::parse();
    let program = Program::load(&cli.input)
        .with_context(|| format!("could not load program from {}", cli.input.display()))?;

    if cli.part != Part::Two {
        find_loop(&program)?;
    }
    if cli.part != Part::One {
        fix_program(&program)?;
    }
    Ok(())
}

fn find_loop(program: &Program) -> Result<()> {
    println!("== Part one ==");

    let report = run(program).context("emulation aborted")?;
    if report.loop_detected() {
        println!(
            "Loop found at instruction {}, accumulator = {}",
            report.ip, report.acc
        );
    } else {
        println!("No loop found");
    }
    Ok(())
}

fn fix_program(program: &Program) -> Result<()> {
    println!("== Part two ==");

    match repair(program).context("repair search aborted")? {
        Some(fix) => println!(
            "Changed {} => {} at {}: accumulator = {}, instruction pointer = {}",
            fix.original, fix.patched, fix.index, fix.report.acc, fix.report.ip
        ),
        None => println!("No single-instruction repair found"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn defaults_to_bundled_demo() {
        let cli = Cli::parse_from(["handheld-emu"]);
        assert_eq!(cli.input, PathBuf::from(DEFAULT_INPUT));
        assert!(cli.part == Part::All);

        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(&cli.input);
        let program = Program::load(path).unwrap();
        let report = run(&program).unwrap();
        assert!(report.loop_detected());
        assert_eq!((report.acc, report.ip), (5, 1));
    }

    #[test]
    fn part_is_selectable() {
        let cli = Cli::parse_from(["handheld-emu", "listing.txt", "--part", "2"]);
        assert_eq!(cli.input, PathBuf::from("listing.txt"));
        assert!(cli.part == Part::Two);
    }
}
