//! Job board search pipeline.
//!
//! A single generic [`search::SearchCriteria`] is fanned out to every enabled
//! [`boards::JobBoard`], each board's response is normalized into
//! [`postings::JobPosting`] values, and the aggregated list is handed to the
//! [`output::FileWriter`].

pub mod boards;
pub mod config;
pub mod error;
pub mod output;
pub mod postings;
pub mod search;
pub mod telemetry;
