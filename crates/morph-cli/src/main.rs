//! Console harness for Morph.
//!
//! Loads a configuration from JSON, runs the chosen phase on it through a
//! [`Stepper`] and logs every committed move. Optionally records a binary
//! move trace and saves the final configuration.
//!
//! ```bash
//! morph shape.json
//! morph shape.json --phase canonicalize --max-moves 500
//! morph shape.json --trace run.mrph --verify --save final.json
//! RUST_LOG=morph_algo=trace morph shape.json
//! ```
//!
//! On failure the last state of the world is printed to stderr and the
//! process exits non-zero.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use morph_algo::{CompactConfig, GatherConfig, Phase, ReconfigConfig, Stepper};
use morph_replay::{replay_and_verify, ConfigurationFile, ReplayError, TraceReader, TraceWriter};
use morph_world::World;

/// Phase selector for `--phase`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
    /// Gather, compaction and one retry.
    Complete,
    /// Carry loose units into weak links.
    Gather,
    /// Compaction, first candidate wins.
    Compact,
    /// Compaction, best-scoring candidate wins.
    CompactSorted,
    /// Descend the x + y potential.
    Canonicalize,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Complete => Phase::Complete,
            PhaseArg::Gather => Phase::Gather,
            PhaseArg::Compact => Phase::Compact,
            PhaseArg::CompactSorted => Phase::CompactSorted,
            PhaseArg::Canonicalize => Phase::Canonicalize,
        }
    }
}

/// Run a sliding-square reconfiguration on a saved configuration.
#[derive(Parser, Debug)]
#[command(name = "morph", author, version, about, long_about = None)]
struct Args {
    /// JSON configuration to load.
    config: PathBuf,

    /// Which phase to run.
    #[arg(long, value_enum, default_value_t = PhaseArg::Complete)]
    phase: PhaseArg,

    /// Stop with an error after this many moves.
    #[arg(long)]
    max_moves: Option<usize>,

    /// Record a binary move trace to this file.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Replay the recorded trace afterwards and check it (needs --trace).
    #[arg(long, requires = "trace")]
    verify: bool,

    /// Save the final configuration as JSON.
    #[arg(long)]
    save: Option<PathBuf>,

    /// Use unsorted compaction inside the complete procedure.
    #[arg(long)]
    unsorted: bool,

    /// Bridge capacity at or above which a light unit is left alone.
    #[arg(long)]
    light_capacity_limit: Option<usize>,

    /// Gather rounds allowed per unit.
    #[arg(long)]
    max_rounds_per_unit: Option<usize>,

    /// Shortest run of loose units compaction may shift.
    #[arg(long)]
    min_chain_len: Option<usize>,

    /// Fail a compaction round with no local candidate instead of
    /// carrying a unit along the move graph.
    #[arg(long)]
    no_carry: bool,
}

impl Args {
    fn reconfig(&self) -> ReconfigConfig {
        let gather = GatherConfig::default();
        let compact = CompactConfig::default();
        ReconfigConfig {
            gather: GatherConfig {
                light_capacity_limit: self
                    .light_capacity_limit
                    .unwrap_or(gather.light_capacity_limit),
                max_rounds_per_unit: self
                    .max_rounds_per_unit
                    .unwrap_or(gather.max_rounds_per_unit),
            },
            compact: CompactConfig {
                min_chain_len: self.min_chain_len.unwrap_or(compact.min_chain_len),
                carry: !self.no_carry,
                ..compact
            },
            sorted_compaction: !self.unsorted,
            max_moves: self.max_moves,
        }
    }

    fn phase_name(&self) -> &'static str {
        Phase::from(self.phase).as_str()
    }
}

fn load_world(path: &Path) -> Result<World> {
    let file = ConfigurationFile::load(path)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
    let world = file
        .to_world()
        .with_context(|| format!("invalid configuration {}", path.display()))?;
    Ok(world)
}

fn open_trace(path: &Path, start: &World) -> Result<TraceWriter<BufWriter<File>>> {
    let file =
        File::create(path).with_context(|| format!("failed to create trace {}", path.display()))?;
    let writer = TraceWriter::new(BufWriter::new(file), start)
        .with_context(|| format!("failed to write trace header to {}", path.display()))?;
    Ok(writer)
}

fn verify_trace(path: &Path) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("failed to reopen trace {}", path.display()))?;
    let reader = TraceReader::open(BufReader::new(file))?;
    let summary = replay_and_verify(reader)
        .with_context(|| format!("trace {} does not replay", path.display()))?;
    tracing::info!(frames = summary.frames, "trace verified");
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = args.reconfig();
    config.validate().context("invalid tunables")?;

    let world = load_world(&args.config)?;
    tracing::info!(
        units = world.len(),
        phase = %Phase::from(args.phase),
        "configuration loaded"
    );

    let mut trace = match &args.trace {
        Some(path) => Some(open_trace(path, &world)?),
        None => None,
    };
    let mut trace_error: Option<ReplayError> = None;

    let mut stepper = Stepper::configured(world, &config);
    let mut seq = Phase::from(args.phase).sequence(&config);
    let outcome = stepper.run_with(seq.as_mut(), |mv, world| {
        tracing::info!("{} -> {}", mv.source, mv.target());
        if trace_error.is_some() {
            return;
        }
        if let Some(writer) = trace.as_mut() {
            trace_error = writer.record(mv, world).err();
        }
    });

    if let Some(mut writer) = trace.take() {
        writer.flush().context("failed to flush trace")?;
    }
    if let Some(e) = trace_error {
        return Err(e).context("failed to record move trace");
    }

    let metrics = stepper.metrics();
    if let Err(e) = outcome {
        eprintln!("{}", stepper.world());
        return Err(e).context(format!(
            "{} failed after {} moves",
            args.phase_name(),
            metrics.moves
        ));
    }
    tracing::info!(
        moves = metrics.moves,
        pulls = metrics.pulls,
        total_us = metrics.total_us,
        monotone = stepper.world().is_xy_monotone(),
        "run finished"
    );
    for (phase, moves) in &metrics.moves_per_phase {
        tracing::debug!(phase = %phase, moves, "moves per phase");
    }

    if args.verify {
        if let Some(path) = &args.trace {
            verify_trace(path)?;
        }
    }
    if let Some(path) = &args.save {
        ConfigurationFile::capture(stepper.world())
            .save(path)
            .with_context(|| format!("failed to save configuration to {}", path.display()))?;
        tracing::info!(path = %path.display(), "final configuration saved");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_run_the_complete_procedure() {
        let args = Args::try_parse_from(["morph", "shape.json"]).unwrap();
        assert_eq!(args.phase, PhaseArg::Complete);
        assert_eq!(args.reconfig(), ReconfigConfig::default());
    }

    #[test]
    fn phase_names_are_kebab_case() {
        let args = Args::try_parse_from(["morph", "s.json", "--phase", "compact-sorted"]).unwrap();
        assert_eq!(Phase::from(args.phase), Phase::CompactSorted);
        assert!(Args::try_parse_from(["morph", "s.json", "--phase", "shuffle"]).is_err());
    }

    #[test]
    fn every_phase_arg_names_its_phase() {
        for arg in PhaseArg::value_variants() {
            let name = arg.to_possible_value().unwrap().get_name().to_string();
            assert_eq!(Phase::from(*arg).as_str(), name);
        }
    }

    #[test]
    fn tunables_reach_the_config() {
        let args = Args::try_parse_from([
            "morph",
            "s.json",
            "--unsorted",
            "--max-moves",
            "40",
            "--min-chain-len",
            "3",
            "--no-carry",
        ])
        .unwrap();
        let config = args.reconfig();
        assert!(!config.sorted_compaction);
        assert_eq!(config.max_moves, Some(40));
        assert_eq!(config.compact.min_chain_len, 3);
        assert!(!config.compact.carry);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn verify_needs_a_trace() {
        assert!(Args::try_parse_from(["morph", "s.json", "--verify"]).is_err());
    }
}
