pub mod engine;
pub mod enrich;
pub mod publisher;

pub use engine::Engine;
pub use enrich::{assemble_controllers, ControllerState};
pub use publisher::Publisher;
