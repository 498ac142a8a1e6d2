pub mod accumulator;
pub mod codec;
pub mod config;
pub mod engine;
pub mod events;
pub mod metadata;
pub mod pipeline;
pub mod profile;
pub mod sink;
pub mod types;

pub use accumulator::{BatchDecision, BatchReport, KeyClass, KeyFilter, ListingAccumulator};
pub use codec::*;
pub use config::*;
pub use engine::ListingEngine;
pub use metadata::*;
pub use pipeline::{ListingTask, TaskState};
pub use profile::*;
pub use sink::*;
pub use types::*;
