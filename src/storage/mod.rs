pub mod high_score;

pub use high_score::{JsonFileScoreStore, MemoryScoreStore, ScoreStore, StoreError};
