pub mod command;
pub mod config;
pub mod error;
pub mod identity;
pub mod report;

pub use command::*;
pub use config::*;
pub use error::*;
pub use identity::*;
pub use report::*;
