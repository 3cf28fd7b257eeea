//! Command-line arguments.

use clap::Parser;

use crate::types::{AppError, AppResult};

#[derive(Parser, Debug)]
#[command(name = "overview-mentions")]
#[command(version)]
#[command(about = "Check whether a company shows up in Google's AI Overview for a query", long_about = None)]
pub struct Args {
    /// Your search query
    #[arg(short, long)]
    pub query: String,

    /// Company name
    #[arg(short, long)]
    pub company: String,

    /// Optional location parameter (e.g. "Austin, Texas, United States")
    #[arg(short, long)]
    pub location: Option<String>,

    /// Check how many times the company showed up in the AI Overview
    #[arg(long)]
    pub metrics: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Reject inputs that would make the search pointless. Runs before any
    /// network call.
    pub fn validate(&self) -> AppResult<()> {
        if self.company.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "company name must not be empty".to_string(),
            ));
        }
        if self.query.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }
}
