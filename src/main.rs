//! genprog - evolve an arithmetic expression that predicts the last column
//! of a tab-separated table.
//!
//! ```bash
//! genprog -g 500 -s 42 data.tsv
//! cat data.tsv | genprog --absolute-error --enable-remove-introns
//! ```

use anyhow::Context;
use clap::Parser;
use genprog::config::{AppConfig, ConfigManager, ErrorMetric};
use genprog::data::TsvConnector;
use genprog::engines::generation::{ConsoleProgressCallback, EvolutionEngine};
use genprog::functions::OperatorCatalog;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// Symbolic regression by genetic programming.
#[derive(Parser, Debug)]
#[command(name = "genprog", version)]
#[command(about = "Evolve an expression over the input columns that approximates the last column")]
struct Cli {
    /// Tab-separated input; stdin when absent.
    input: Option<PathBuf>,

    /// TOML or JSON file with [evolution] and [fitness] sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generation cap (unbounded by default).
    #[arg(short = 'g', long)]
    generations: Option<u64>,

    #[arg(short = 's', long)]
    random_seed: Option<u64>,

    #[arg(short = 'b', long)]
    min_bases: Option<usize>,

    #[arg(short = 'B', long)]
    max_bases: Option<usize>,

    #[arg(short = 'n', long)]
    min_genomes: Option<usize>,

    #[arg(short = 'N', long)]
    max_genomes: Option<usize>,

    #[arg(long)]
    mutation_probability: Option<f64>,

    /// Share of rows a genome may fail on.
    #[arg(long)]
    max_error_fraction: Option<f64>,

    /// Stop once the best fitness is at or below this value.
    #[arg(long)]
    min_fitness: Option<f64>,

    #[arg(long)]
    mass_extinction_every: Option<u64>,

    /// Sum absolute instead of squared differences.
    #[arg(long)]
    absolute_error: bool,

    /// Allow crossover of a genome with itself.
    #[arg(long)]
    enable_self_self: bool,

    /// Carry a mutated copy of the best genome into each generation.
    #[arg(long)]
    enable_best_survives: bool,

    #[arg(long)]
    enable_remove_introns: bool,

    /// Drop offspring identical to a parent.
    #[arg(long)]
    enable_remove_clone: bool,

    /// Prefer shorter genomes on equal fitness.
    #[arg(long)]
    genome_size_matters: bool,

    /// Compare min-max normalized outputs and target.
    #[arg(long)]
    normalize_data: bool,

    /// Print the resolved configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// -v for info, -vv for debug.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line values win over file and environment. Flags only switch
    /// options on.
    fn apply(&self, config: &mut AppConfig) {
        let evolution = &mut config.evolution;
        if let Some(cap) = self.generations {
            evolution.max_generations = Some(cap);
        }
        if let Some(seed) = self.random_seed {
            evolution.seed = Some(seed);
        }
        if let Some(n) = self.min_bases {
            evolution.min_bases = n;
        }
        if let Some(n) = self.max_bases {
            evolution.max_bases = n;
        }
        if let Some(n) = self.min_genomes {
            evolution.min_genomes = n;
        }
        if let Some(n) = self.max_genomes {
            evolution.max_genomes = n;
        }
        if let Some(p) = self.mutation_probability {
            evolution.probability_mutation = p;
        }
        if let Some(every) = self.mass_extinction_every {
            evolution.mass_extinction_every = Some(every);
        }
        evolution.enable_self_crossover |= self.enable_self_self;
        evolution.best_will_survive |= self.enable_best_survives;
        evolution.remove_clones |= self.enable_remove_clone;
        evolution.genome_size_matters |= self.genome_size_matters;

        let fitness = &mut config.fitness;
        if let Some(fraction) = self.max_error_fraction {
            fitness.max_fraction_of_errors = fraction;
        }
        if let Some(target) = self.min_fitness {
            fitness.min_fitness = target;
        }
        if self.absolute_error {
            fitness.metric = ErrorMetric::Absolute;
        }
        fitness.remove_introns |= self.enable_remove_introns;
        fitness.normalize_data |= self.normalize_data;
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut manager = ConfigManager::load(cli.config.as_deref()).context("Invalid configuration")?;
    manager
        .update(|config| cli.apply(config))
        .context("Invalid command-line options")?;

    if cli.print_config {
        println!("{}", manager.to_json()?);
        return Ok(());
    }

    let (data, source) = match &cli.input {
        Some(path) => (
            TsvConnector::load(path).with_context(|| format!("Failed to load {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (
            TsvConnector::load_from_reader(std::io::stdin().lock()).context("Failed to load stdin")?,
            "<stdin>".to_string(),
        ),
    };
    let metadata = TsvConnector::create_metadata(&source, &data);
    log::info!(
        "Loaded {}: {} rows x {} columns, target in [{}, {}]",
        metadata.source,
        metadata.num_rows,
        metadata.num_columns,
        metadata.target_range.0,
        metadata.target_range.1
    );

    let engine = EvolutionEngine::new(
        Arc::new(OperatorCatalog::standard()),
        Arc::new(data),
        &manager.get(),
    )?;
    let mut progress = ConsoleProgressCallback::stdio();
    let outcome = engine.run(&mut progress);

    log::info!(
        "Finished in state {:?} after {} generations (seed {}, {} improvements)",
        outcome.state,
        outcome.generations,
        outcome.seed,
        outcome.history.len()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("genprog: {:#}", e);
        process::exit(1);
    }
}
