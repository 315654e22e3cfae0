pub use duplex_core::{PeerId, RoomId};

pub mod model {
    pub use duplex_core::model::*;
    pub use duplex_core::utils::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use duplex_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use duplex_client::*;
}
