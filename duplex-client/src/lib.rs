mod config;
mod controller;
mod error;
mod media;
mod signaling;
mod transport;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use media::*;
pub use signaling::*;
pub use transport::*;
