//! Split zipped bank-campaign extracts into client, campaign and economics
//! CSV tables.
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod transform;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{CampaignError, InvalidDate, Result};
pub use pipeline::{run, RunSummary};
