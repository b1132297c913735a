mod registry;
mod status;

pub use registry::{SessionHandle, SessionRegistry};
pub use status::StatusPublisher;
