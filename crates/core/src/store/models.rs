/// Persistent entities of the relay
///
/// Entities are created lazily and never hard-deleted. Partial updates go
/// through [`UserUpdate`], which names every field a transition may touch.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use whisper_common::{
    AccountId, InvitationQuota, LinkKey, Locale, MessageRef, State, Timestamp, UserId,
};

/// Key prefix of invitation entries in the shared item namespace
pub const INVITATION_KEY_PREFIX: &str = "INVITATION#";

/// Key prefix of gated-access records in the shared item namespace
pub const ACCESS_KEY_PREFIX: &str = "INVITER#";

pub fn invitation_key(code: &str) -> String {
    format!("{}{}", INVITATION_KEY_PREFIX, code)
}

pub fn access_key(user: &UserId) -> String {
    format!("{}{}", ACCESS_KEY_PREFIX, user.to_hex())
}

/// A relay user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Durable identity, never shown to a peer
    pub id: UserId,

    /// Platform account, also the private chat the user is reached in
    pub account_id: AccountId,

    /// Public username, always lowercase
    pub username: Option<String>,

    pub state: State,

    /// Peer being addressed while `Sending`
    pub contact: Option<UserId>,

    /// Message in the peer's chat the next send threads under
    pub reply_message: Option<MessageRef>,

    /// "Message sent" placeholder in the peer's chat, retracted after the send
    pub delivery_message: Option<MessageRef>,

    /// Peers this user has blocked. Only this side is recorded.
    pub blocked: BTreeSet<UserId>,

    /// Explicit language preference
    pub locale: Option<Locale>,

    pub link_key: LinkKey,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(id: UserId, account_id: AccountId, link_key: LinkKey, created_at: Timestamp) -> Self {
        Self {
            id,
            account_id,
            username: None,
            state: State::Idle,
            contact: None,
            reply_message: None,
            delivery_message: None,
            blocked: BTreeSet::new(),
            locale: None,
            link_key,
            created_at,
        }
    }

    /// Whether any of the fields owned by `Sending` is set
    pub fn has_relay_context(&self) -> bool {
        self.contact.is_some() || self.reply_message.is_some() || self.delivery_message.is_some()
    }

    pub fn has_blocked(&self, peer: &UserId) -> bool {
        self.blocked.contains(peer)
    }

    /// Mirror a stored update onto this copy
    pub fn apply(&mut self, update: &UserUpdate) {
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(contact) = update.contact {
            self.contact = contact;
        }
        if let Some(reply) = update.reply_message {
            self.reply_message = reply;
        }
        if let Some(delivery) = update.delivery_message {
            self.delivery_message = delivery;
        }
        if let Some(username) = &update.username {
            self.username = username.clone();
        }
        if let Some(locale) = update.locale {
            self.locale = locale;
        }
    }

    pub fn apply_blocklist(&mut self, op: &BlocklistOp) {
        match op {
            BlocklistOp::Add(peer) => {
                self.blocked.insert(*peer);
            }
            BlocklistOp::Remove(peer) => {
                self.blocked.remove(peer);
            }
            BlocklistOp::Clear => self.blocked.clear(),
        }
    }
}

/// Field-level update of a [`User`]
///
/// `None` leaves a field untouched; `Some(None)` clears it. State changes go
/// through [`UserUpdate::enter`] so leaving `Sending` always clears the relay
/// fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    state: Option<State>,
    contact: Option<Option<UserId>>,
    reply_message: Option<Option<MessageRef>>,
    delivery_message: Option<Option<MessageRef>>,
    username: Option<Option<String>>,
    locale: Option<Option<Locale>>,
}

impl UserUpdate {
    /// An update that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to `state`, clearing the relay fields unless it owns them
    pub fn enter(state: State) -> Self {
        let update = Self {
            state: Some(state),
            ..Self::default()
        };
        if state.holds_relay_context() {
            update
        } else {
            update.clear_relay_context()
        }
    }

    /// Back to `Idle` with every transient field cleared
    pub fn reset() -> Self {
        Self::enter(State::Idle)
    }

    /// Enter `Sending` towards `contact`
    pub fn sending(
        contact: UserId,
        reply_message: Option<MessageRef>,
        delivery_message: Option<MessageRef>,
    ) -> Self {
        Self {
            state: Some(State::Sending),
            contact: Some(Some(contact)),
            reply_message: Some(reply_message),
            delivery_message: Some(delivery_message),
            ..Self::default()
        }
    }

    pub fn username(mut self, username: Option<String>) -> Self {
        self.username = Some(username);
        self
    }

    pub fn locale(mut self, locale: Option<Locale>) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn state(&self) -> Option<State> {
        self.state
    }

    pub fn username_change(&self) -> Option<Option<&str>> {
        self.username.as_ref().map(|u| u.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn clear_relay_context(mut self) -> Self {
        self.contact = Some(None);
        self.reply_message = Some(None);
        self.delivery_message = Some(None);
        self
    }
}

/// Change to a user's own block set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlocklistOp {
    Add(UserId),
    Remove(UserId),
    Clear,
}

/// Gated-access record. Its presence means the user is registered; the
/// quota bounds how many invitation usages the user may still mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub user_id: UserId,
    pub quota: InvitationQuota,
    pub registered_at: Timestamp,
}

impl AccessRecord {
    pub fn new(user_id: UserId, quota: InvitationQuota) -> Self {
        Self {
            user_id,
            quota,
            registered_at: Timestamp::now(),
        }
    }
}

/// A minted invitation code. `usages.left()` was deducted from the inviter's
/// quota when the code was minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub code: String,
    pub inviter: UserId,
    pub usages: InvitationQuota,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::new(
            UserId::from_bytes([1u8; 16]),
            AccountId(10),
            LinkKey(123_456),
            Timestamp(1_700_000_000),
        )
    }

    #[test]
    fn test_sending_sets_relay_context() {
        let peer = UserId::from_bytes([2u8; 16]);
        let mut user = test_user();
        user.apply(&UserUpdate::sending(peer, Some(MessageRef(5)), None));

        assert_eq!(user.state, State::Sending);
        assert_eq!(user.contact, Some(peer));
        assert_eq!(user.reply_message, Some(MessageRef(5)));
        assert_eq!(user.delivery_message, None);
    }

    #[test]
    fn test_leaving_sending_clears_context() {
        let peer = UserId::from_bytes([2u8; 16]);
        for state in [
            State::Idle,
            State::SettingUsername,
            State::GeneratingInvitation,
            State::AwaitingInvitationCode,
        ] {
            let mut user = test_user();
            user.apply(&UserUpdate::sending(peer, Some(MessageRef(5)), Some(MessageRef(6))));
            user.apply(&UserUpdate::enter(state));

            assert_eq!(user.state, state);
            assert!(!user.has_relay_context(), "{:?} kept relay context", state);
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut user = test_user();
        user.apply(&UserUpdate::sending(
            UserId::from_bytes([3u8; 16]),
            Some(MessageRef(1)),
            Some(MessageRef(2)),
        ));

        user.apply(&UserUpdate::reset());
        let once = user.clone();
        user.apply(&UserUpdate::reset());

        assert_eq!(user, once);
        assert_eq!(user.state, State::Idle);
    }

    #[test]
    fn test_update_leaves_untouched_fields() {
        let mut user = test_user();
        user.username = Some("alice".to_string());
        user.apply(&UserUpdate::new().locale(Some(Locale::FaIr)));

        assert_eq!(user.username.as_deref(), Some("alice"));
        assert_eq!(user.locale, Some(Locale::FaIr));
        assert!(UserUpdate::new().is_empty());
        assert!(!UserUpdate::reset().is_empty());
    }

    #[test]
    fn test_blocklist_ops() {
        let peer = UserId::from_bytes([9u8; 16]);
        let mut user = test_user();

        user.apply_blocklist(&BlocklistOp::Add(peer));
        user.apply_blocklist(&BlocklistOp::Add(peer));
        assert!(user.has_blocked(&peer));
        assert_eq!(user.blocked.len(), 1);

        user.apply_blocklist(&BlocklistOp::Remove(peer));
        assert!(!user.has_blocked(&peer));

        user.apply_blocklist(&BlocklistOp::Add(peer));
        user.apply_blocklist(&BlocklistOp::Clear);
        assert!(user.blocked.is_empty());
    }

    #[test]
    fn test_item_keys_are_namespaced() {
        let user = UserId::from_bytes([0xab; 16]);
        assert_eq!(invitation_key("whisper-abc-def"), "INVITATION#whisper-abc-def");
        assert_eq!(access_key(&user), format!("INVITER#{}", "ab".repeat(16)));
    }
}
