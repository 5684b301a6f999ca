pub mod config;
pub mod executor;
pub mod progress;
pub mod tasks;
pub mod worker;

pub use config::*;
pub use executor::*;
pub use progress::*;
pub use tasks::*;
pub use worker::*;
