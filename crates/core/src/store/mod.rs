/// Entity store collaborators
///
/// The relay reads and writes users, gated-access records and invitations
/// through these traits. Updates are unconditional; the later write wins.

pub mod memory;
pub mod models;

pub use memory::MemoryStore;
pub use models::{AccessRecord, BlocklistOp, Invitation, User, UserUpdate};

use std::future::Future;
use thiserror::Error;
use whisper_common::{AccountId, InvitationQuota, LinkKey, Timestamp, UserId, WhisperError};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store backend failure: {0}")]
    Backend(String),

    #[error("Unique index {index} already holds {value}")]
    Conflict { index: &'static str, value: String },

    #[error("No entity under {0}")]
    Missing(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for WhisperError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => WhisperError::validation(err.to_string()),
            StoreError::Backend(_) | StoreError::Missing(_) => {
                WhisperError::collaborator(err.to_string())
            }
        }
    }
}

/// User directory: users by durable identity plus the account, username
/// and link secondary indexes.
pub trait UserStore: Send + Sync {
    fn get_user(&self, id: UserId) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn get_user_by_account(
        &self,
        account_id: AccountId,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    /// `username` must already be lowercase
    fn get_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn get_user_by_link(
        &self,
        link_key: LinkKey,
        created_at: Timestamp,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn put_user(&self, user: User) -> impl Future<Output = StoreResult<()>> + Send;

    /// Apply `update` and return the stored result
    fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> impl Future<Output = StoreResult<User>> + Send;

    fn update_blocklist(
        &self,
        id: UserId,
        op: BlocklistOp,
    ) -> impl Future<Output = StoreResult<User>> + Send;
}

/// Gated-access records and invitation codes
pub trait InvitationStore: Send + Sync {
    fn get_access(
        &self,
        user: UserId,
    ) -> impl Future<Output = StoreResult<Option<AccessRecord>>> + Send;

    fn put_access(&self, record: AccessRecord) -> impl Future<Output = StoreResult<()>> + Send;

    fn update_access(
        &self,
        user: UserId,
        quota: InvitationQuota,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn get_invitation(
        &self,
        code: &str,
    ) -> impl Future<Output = StoreResult<Option<Invitation>>> + Send;

    fn put_invitation(&self, invitation: Invitation)
        -> impl Future<Output = StoreResult<()>> + Send;

    fn update_invitation(
        &self,
        code: &str,
        usages: InvitationQuota,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Every invitation minted by `inviter`, ordered by code
    fn list_invitations(
        &self,
        inviter: UserId,
    ) -> impl Future<Output = StoreResult<Vec<Invitation>>> + Send;
}
