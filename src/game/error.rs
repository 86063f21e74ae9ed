use thiserror::Error;

use super::config::ConfigError;
use super::food::PlacementError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}
