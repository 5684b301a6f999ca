pub mod aggregators;

pub use aggregators::*;
