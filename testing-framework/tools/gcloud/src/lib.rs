mod client;
mod errors;
pub mod matching;

pub use blueprint_test_core::scenario::CliRunOptions;
pub use client::{Gcloud, run, split_command};
pub use errors::GcloudError;
pub use matching::{first_match_result, get_path};
