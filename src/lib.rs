pub mod common;
pub mod processing;
pub mod server;

pub use processing::{Payload, StegoError};
pub use server::StegoCore;
