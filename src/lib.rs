pub mod args;
pub mod model;
pub mod simulation;
pub mod utils;
