pub mod local;
pub mod organic;

pub use local::LocalRankResolver;
pub use organic::OrganicRankResolver;
