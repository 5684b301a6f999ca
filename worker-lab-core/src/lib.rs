pub mod error;
pub mod messages;

pub use error::*;
pub use messages::*;
