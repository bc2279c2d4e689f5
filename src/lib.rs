pub mod algorithm;
pub mod forest;
pub mod graph;
pub mod heuristics;
pub mod log;
pub mod random_models;
pub mod signal_handling;
