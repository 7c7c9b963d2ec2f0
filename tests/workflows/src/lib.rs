pub mod defaults;
pub mod plans;

pub use blueprint_test_workflows::{BlueprintBuilderExt, BucketLookup};
