/// In-memory entity store
///
/// Backs tests and the standalone daemon. Users live in one map; access
/// records and invitations share a second map under prefixed keys, the way
/// a single-table key-value deployment lays them out.

use super::models::{access_key, invitation_key, AccessRecord, BlocklistOp, Invitation, User, UserUpdate};
use super::{InvitationStore, StoreError, StoreResult, UserStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use whisper_common::{AccountId, InvitationQuota, LinkKey, Timestamp, UserId};

#[derive(Debug, Clone)]
enum Item {
    Access(AccessRecord),
    Invitation(Invitation),
}

/// Shared in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    items: Arc<RwLock<HashMap<String, Item>>>,

    /// When set, every call fails with a backend error
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage of the backing store
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }

    fn find_user<F>(users: &HashMap<UserId, User>, predicate: F) -> Option<User>
    where
        F: Fn(&User) -> bool,
    {
        users.values().find(|u| predicate(u)).cloned()
    }

    fn check_username_free(
        users: &HashMap<UserId, User>,
        owner: UserId,
        username: &str,
    ) -> StoreResult<()> {
        let taken = users
            .values()
            .any(|u| u.id != owner && u.username.as_deref() == Some(username));
        if taken {
            return Err(StoreError::Conflict {
                index: "username",
                value: username.to_string(),
            });
        }
        Ok(())
    }
}

impl UserStore for MemoryStore {
    async fn get_user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.check_available()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_account(&self, account_id: AccountId) -> StoreResult<Option<User>> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(Self::find_user(&users, |u| u.account_id == account_id))
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(Self::find_user(&users, |u| u.username.as_deref() == Some(username)))
    }

    async fn get_user_by_link(
        &self,
        link_key: LinkKey,
        created_at: Timestamp,
    ) -> StoreResult<Option<User>> {
        self.check_available()?;
        let users = self.users.read().await;
        Ok(Self::find_user(&users, |u| {
            u.link_key == link_key && u.created_at == created_at
        }))
    }

    async fn put_user(&self, user: User) -> StoreResult<()> {
        self.check_available()?;
        let mut users = self.users.write().await;

        let account_taken = users
            .values()
            .any(|u| u.id != user.id && u.account_id == user.account_id);
        if account_taken {
            return Err(StoreError::Conflict {
                index: "account_id",
                value: user.account_id.to_string(),
            });
        }
        if let Some(username) = &user.username {
            Self::check_username_free(&users, user.id, username)?;
        }

        users.insert(user.id, user);
        Ok(())
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> StoreResult<User> {
        self.check_available()?;
        let mut users = self.users.write().await;

        if let Some(Some(username)) = update.username_change() {
            Self::check_username_free(&users, id, username)?;
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::Missing(format!("user {}", id.short_hex())))?;
        user.apply(&update);
        Ok(user.clone())
    }

    async fn update_blocklist(&self, id: UserId, op: BlocklistOp) -> StoreResult<User> {
        self.check_available()?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::Missing(format!("user {}", id.short_hex())))?;
        user.apply_blocklist(&op);
        Ok(user.clone())
    }
}

impl InvitationStore for MemoryStore {
    async fn get_access(&self, user: UserId) -> StoreResult<Option<AccessRecord>> {
        self.check_available()?;
        let items = self.items.read().await;
        Ok(match items.get(&access_key(&user)) {
            Some(Item::Access(record)) => Some(record.clone()),
            _ => None,
        })
    }

    async fn put_access(&self, record: AccessRecord) -> StoreResult<()> {
        self.check_available()?;
        let key = access_key(&record.user_id);
        self.items.write().await.insert(key, Item::Access(record));
        Ok(())
    }

    async fn update_access(&self, user: UserId, quota: InvitationQuota) -> StoreResult<()> {
        self.check_available()?;
        let key = access_key(&user);
        let mut items = self.items.write().await;
        match items.get_mut(&key) {
            Some(Item::Access(record)) => {
                record.quota = quota;
                Ok(())
            }
            _ => Err(StoreError::Missing(key)),
        }
    }

    async fn get_invitation(&self, code: &str) -> StoreResult<Option<Invitation>> {
        self.check_available()?;
        let items = self.items.read().await;
        Ok(match items.get(&invitation_key(code)) {
            Some(Item::Invitation(invitation)) => Some(invitation.clone()),
            _ => None,
        })
    }

    async fn put_invitation(&self, invitation: Invitation) -> StoreResult<()> {
        self.check_available()?;
        let key = invitation_key(&invitation.code);
        self.items
            .write()
            .await
            .insert(key, Item::Invitation(invitation));
        Ok(())
    }

    async fn update_invitation(&self, code: &str, usages: InvitationQuota) -> StoreResult<()> {
        self.check_available()?;
        let key = invitation_key(code);
        let mut items = self.items.write().await;
        match items.get_mut(&key) {
            Some(Item::Invitation(invitation)) => {
                invitation.usages = usages;
                Ok(())
            }
            _ => Err(StoreError::Missing(key)),
        }
    }

    async fn list_invitations(&self, inviter: UserId) -> StoreResult<Vec<Invitation>> {
        self.check_available()?;
        let items = self.items.read().await;
        let mut invitations: Vec<Invitation> = items
            .values()
            .filter_map(|item| match item {
                Item::Invitation(invitation) if invitation.inviter == inviter => {
                    Some(invitation.clone())
                }
                _ => None,
            })
            .collect();
        invitations.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(invitations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whisper_common::State;

    fn user(seed: u8, account: i64) -> User {
        User::new(
            UserId::from_bytes([seed; 16]),
            AccountId(account),
            LinkKey(100_000 + seed as u32),
            Timestamp(1_700_000_000),
        )
    }

    #[tokio::test]
    async fn test_user_secondary_lookups() {
        let store = MemoryStore::new();
        let mut alice = user(1, 11);
        alice.username = Some("alice".to_string());
        store.put_user(alice.clone()).await.unwrap();

        let by_account = store.get_user_by_account(AccountId(11)).await.unwrap();
        assert_eq!(by_account, Some(alice.clone()));

        let by_name = store.get_user_by_username("alice").await.unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(alice.id));

        let by_link = store
            .get_user_by_link(alice.link_key, alice.created_at)
            .await
            .unwrap();
        assert_eq!(by_link.map(|u| u.id), Some(alice.id));

        let wrong_time = store
            .get_user_by_link(alice.link_key, Timestamp(1))
            .await
            .unwrap();
        assert!(wrong_time.is_none());
    }

    #[tokio::test]
    async fn test_username_is_unique() {
        let store = MemoryStore::new();
        let mut alice = user(1, 11);
        alice.username = Some("alice".to_string());
        store.put_user(alice.clone()).await.unwrap();
        store.put_user(user(2, 22)).await.unwrap();

        let err = store
            .update_user(
                UserId::from_bytes([2; 16]),
                UserUpdate::new().username(Some("alice".to_string())),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { index: "username", .. }));

        // The owner may write its own username again
        store
            .update_user(alice.id, UserUpdate::new().username(Some("alice".to_string())))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_user_returns_stored_copy() {
        let store = MemoryStore::new();
        let alice = user(1, 11);
        store.put_user(alice.clone()).await.unwrap();

        let updated = store
            .update_user(alice.id, UserUpdate::enter(State::SettingUsername))
            .await
            .unwrap();
        assert_eq!(updated.state, State::SettingUsername);

        let missing = store
            .update_user(UserId::from_bytes([7; 16]), UserUpdate::reset())
            .await;
        assert!(matches!(missing, Err(StoreError::Missing(_))));
    }

    #[tokio::test]
    async fn test_invitation_items() {
        let store = MemoryStore::new();
        let inviter = UserId::from_bytes([1; 16]);

        store
            .put_access(AccessRecord::new(inviter, InvitationQuota::new(5)))
            .await
            .unwrap();
        for code in ["whisper-bbb-ccc", "whisper-aaa-ddd"] {
            store
                .put_invitation(Invitation {
                    code: code.to_string(),
                    inviter,
                    usages: InvitationQuota::new(1),
                })
                .await
                .unwrap();
        }

        let listed = store.list_invitations(inviter).await.unwrap();
        let codes: Vec<_> = listed.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["whisper-aaa-ddd", "whisper-bbb-ccc"]);

        store
            .update_invitation("whisper-aaa-ddd", InvitationQuota::with_counts(0, 1))
            .await
            .unwrap();
        let updated = store.get_invitation("whisper-aaa-ddd").await.unwrap().unwrap();
        assert_eq!(updated.usages.used(), 1);

        // Access records and invitations do not alias each other
        assert!(store.get_invitation(&inviter.to_hex()).await.unwrap().is_none());
        assert!(store
            .update_access(UserId::from_bytes([2; 16]), InvitationQuota::new(1))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_unavailable_store() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let err = store.get_user(UserId::from_bytes([1; 16])).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));

        store.set_unavailable(false);
        assert!(store.get_user(UserId::from_bytes([1; 16])).await.unwrap().is_none());
    }
}
