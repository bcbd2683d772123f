// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: not every test binary uses every helper
#[allow(unused_imports)]
pub use fixtures::TestTree;
#[allow(unused_imports)]
pub use helpers::{
    assert_valid_stats, create_test_services, test_config, FailingEmbedder, MockEmbedder,
};
