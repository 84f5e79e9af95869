pub mod fake_runner;
pub mod helpers;

pub use fake_runner::*;
pub use helpers::*;
