pub mod analysis;
pub mod comparison;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod leaderboard;
pub mod scoring;
pub mod telemetry;
pub mod upstream;
