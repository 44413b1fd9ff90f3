/// Whisper daemon library
///
/// HTTP boundary of the relay: accepts inbound platform events as JSON,
/// routes them through the core and logs outbound actions.

pub mod api;
pub mod transport;

pub use api::{ApiServer, AppState, DaemonRouter};
pub use transport::LogTransport;
