pub mod builder;
pub mod verifications;

pub use builder::BlueprintBuilderExt;
pub use verifications::{
    BucketLookup, BucketsExist, DEFAULT_SERVICES, ServicesEnabled, bucket_names,
};
