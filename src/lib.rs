pub mod app;
pub mod error;
pub mod net;
pub mod sim;
pub mod stats;
pub mod topo;

pub use error::{Result, SimError};

#[cfg(test)]
mod test;
