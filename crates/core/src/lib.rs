pub mod access;
pub mod callback;
pub mod i18n;
pub mod identity;
pub mod relay;
pub mod router;
pub mod store;
pub mod transport;

pub use access::{mutual_block_status, AccessControl, BlockStatus};
pub use callback::{CallbackAction, CallbackError};
pub use i18n::{BuiltinCatalog, Catalog, TextId};
pub use identity::{resolve_identity, validate_username, LinkCodec, LinkError, UsernameError};

// Re-export relay types
pub use relay::{CallbackContext, IncomingMessage, Relay, Session};

// Re-export router types
pub use router::{Command, CommandRouter, EventKind, InboundEvent, Outcome};

// Re-export store types
pub use store::{
    AccessRecord, BlocklistOp, Invitation, InvitationStore, MemoryStore, StoreError, User,
    UserStore, UserUpdate,
};

pub use transport::{
    Button, Keyboard, Outbound, RecordingTransport, SendOptions, Transport, TransportError,
};
