pub mod genome;
pub mod operators;
pub mod population;
pub mod hall_of_fame;
pub mod evolution_engine;
pub mod progress;

pub use genome::Genome;
pub use operators::{
    crossover, delete_span, insert_random, mutate, random_genome, silent_mutation, splice_parents, NodeFactory,
};
pub use population::Generation;
pub use hall_of_fame::{HallOfFame, Improvement};
pub use evolution_engine::{
    BestReport, EvolutionEngine, EvolutionOutcome, EvolutionState, GenerationSummary, ProgressCallback,
};
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressMessage};
