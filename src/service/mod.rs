pub mod allocation;
pub mod matcher;
pub mod tree;

pub use matcher::MatcherService;
