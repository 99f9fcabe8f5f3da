mod error;
mod memory;
mod record;
mod traits;

pub mod conformance;

pub use error::SessionError;
pub use memory::InMemorySession;
pub use record::SessionMutation;
pub use traits::{SessionModel, STEPS_KEY};
