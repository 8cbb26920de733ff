//! Self-play training: the episode driver and its statistics.

pub mod stats;
pub mod trainer;

pub use stats::TrainingStats;
pub use trainer::{checkpoint_path, EpisodeResult, Trainer, TrainerConfig};
