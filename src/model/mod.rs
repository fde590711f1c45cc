pub mod confidence;
pub mod config;
pub mod constants;
pub mod ladder_model;
pub mod proven_potential;
pub mod rating_change;
pub mod rating_tracker;
pub mod structures;
pub mod variety;
