//! Search Module
//!
//! Google search through SerpAPI, including retrieval of the AI Overview
//! block (inline or via the `google_ai_overview` page-token engine).

pub mod serpapi;

pub use serpapi::{SearchBackend, SearchError, SerpApiBackend, SerpApiClient};
