pub mod blueprint;
pub mod outputs;
pub mod scenario;

pub use blueprint::Blueprint;
pub use blueprint_test_config::adjust_timeout;
pub use outputs::{OutputError, Outputs};
