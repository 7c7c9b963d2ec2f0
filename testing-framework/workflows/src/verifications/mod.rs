mod buckets;
mod services;

pub use buckets::{BucketLookup, BucketsExist, bucket_names};
pub use services::{DEFAULT_SERVICES, ServicesEnabled};

/// Setup output holding the project the blueprint was applied to.
pub const PROJECT_ID_OUTPUT: &str = "project_id";

#[cfg(test)]
pub(crate) mod test_support;
