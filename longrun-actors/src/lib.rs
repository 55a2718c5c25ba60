pub mod actor;
pub mod builder;
pub mod session;
pub mod system;

pub use session::{SessionActor, SessionMsg};
