/// Webhook API module for the Whisper daemon
///
/// - `POST /events` runs one inbound event through the command router
/// - `GET /health` answers "OK"

pub mod handlers;
pub mod responses;
pub mod server;

pub use handlers::{AppState, DaemonRouter};
pub use responses::*;
pub use server::ApiServer;
