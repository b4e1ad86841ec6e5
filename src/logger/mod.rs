pub mod interaction_log;
pub mod record;

pub use interaction_log::InteractionLogger;
pub use record::{EventKind, InputEvent};
