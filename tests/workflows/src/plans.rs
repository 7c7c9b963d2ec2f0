use std::path::Path;

use blueprint_test_core::{Blueprint, scenario::Builder};
use blueprint_test_workflows::{BlueprintBuilderExt as _, BucketLookup};

pub const SIMPLE_EXAMPLE: &str = "simple_example";

/// The `simple_example` blueprint: the setup project must be known and both
/// buckets derived from it must resolve. The bucket lookup defaults to the
/// stub; pass [`BucketLookup::Live`] to query the cloud.
#[must_use]
pub fn simple_example(root: &Path, lookup: BucketLookup) -> Builder {
    Builder::new(Blueprint::example(root, SIMPLE_EXAMPLE))
        .define_verify("project", |ctx, assert| {
            let project_id = ctx.setup_string_output("project_id")?;
            assert.not_empty("project_id", &project_id);
            Ok(())
        })
        .expect_buckets_exist(lookup)
}
