pub mod arbiter;
pub mod config;
pub mod error;
pub mod keymap;
pub mod session;

pub use arbiter::InputArbiter;
pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{SessionBroadcast, SessionCommand, spawn_session};
