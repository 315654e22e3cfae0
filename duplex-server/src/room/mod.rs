mod relay;
mod room_manager;
mod room_registry;

pub use relay::*;
pub use room_manager::*;
pub use room_registry::*;
