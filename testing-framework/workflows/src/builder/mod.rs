use blueprint_test_core::scenario::Builder as CoreBuilder;

use crate::verifications::{BucketLookup, BucketsExist, ServicesEnabled};

/// Extension methods for registering the common blueprint verifications.
pub trait BlueprintBuilderExt: Sized {
    /// Attach the upload/archive bucket check using `lookup`.
    #[must_use]
    fn expect_buckets_exist(self, lookup: BucketLookup) -> Self;

    /// Attach the service-enablement check for the default APIs.
    #[must_use]
    fn expect_services_enabled(self) -> Self;

    /// Attach the service-enablement check for a custom list of services.
    #[must_use]
    fn expect_services_enabled_for<I, S>(self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;
}

impl BlueprintBuilderExt for CoreBuilder {
    fn expect_buckets_exist(self, lookup: BucketLookup) -> Self {
        self.with_verification(BucketsExist::new(lookup))
    }

    fn expect_services_enabled(self) -> Self {
        self.with_verification(ServicesEnabled::default())
    }

    fn expect_services_enabled_for<I, S>(self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_verification(ServicesEnabled::new(services))
    }
}
