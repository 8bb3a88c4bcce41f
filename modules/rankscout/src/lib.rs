pub mod fetcher;
pub mod pacing;
pub mod pipeline;
pub mod resolver;
pub mod runner;
pub mod sheet;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;
