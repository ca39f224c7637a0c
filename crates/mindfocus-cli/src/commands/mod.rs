pub mod achievements;
pub mod common;
pub mod config;
pub mod quiz;
pub mod stats;
pub mod stress;
pub mod task;
pub mod timer;
pub mod tutor;
