pub mod cli;
pub mod generator;
pub mod model;
pub mod sampler;
pub mod schema;
pub mod store;
pub mod synth;

pub use cli::Cli;
pub use generator::{Generator, Outcome, StopSignal};
pub use sampler::{RandomSampler, Sampler};
pub use store::Store;
pub use synth::{select_synthesizer, TextSynthesizer, FALLBACK_REVIEW};
