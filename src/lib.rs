// Overview Mentions - check whether a company appears in Google's AI Overview

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod overview;
pub mod report;
pub mod search;    // Search APIs (SerpAPI for Google and AI Overview)
pub mod types;

// Re-exports for convenience
pub use analyzer::{analyze, MentionAnalyzer, MentionReport};
pub use config::Config;
pub use overview::OverviewBlock;
