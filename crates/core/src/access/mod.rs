/// Access control
///
/// Mutual blocking between two users and invitation-gated registration.
/// Block sets are recorded only on the blocking side, so every check reads
/// both users.

pub mod invitation;

pub use invitation::{generate_invitation_code, INVITATION_CHARSET};

use crate::store::{AccessRecord, BlocklistOp, Invitation, InvitationStore, User, UserStore};
use std::sync::Arc;
use tracing::{debug, info};
use whisper_common::{InvitationQuota, Result, UserId, WhisperError};

/// Attempts at drawing an unused invitation code
const MAX_CODE_ATTEMPTS: usize = 16;

/// Whether a relay between two users is blocked, and by whom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    None,
    /// The acting user has blocked the peer
    BlockedBySender,
    /// The peer has blocked the acting user
    BlockedByReceiver,
}

/// Sender-side block wins when both sides hold one.
pub fn mutual_block_status(sender: &User, receiver: &User) -> BlockStatus {
    if sender.has_blocked(&receiver.id) {
        BlockStatus::BlockedBySender
    } else if receiver.has_blocked(&sender.id) {
        BlockStatus::BlockedByReceiver
    } else {
        BlockStatus::None
    }
}

/// Block and invitation operations over a store
pub struct AccessControl<S> {
    store: Arc<S>,
}

impl<S> Clone for AccessControl<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> AccessControl<S>
where
    S: UserStore + InvitationStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Add `peer` to `user`'s block set. Idempotent.
    pub async fn block(&self, user: &mut User, peer: UserId) -> Result<()> {
        *user = self.store.update_blocklist(user.id, BlocklistOp::Add(peer)).await?;
        info!("User {} blocked {}", user.id.short_hex(), peer.short_hex());
        Ok(())
    }

    /// Remove `peer` from `user`'s block set. Idempotent.
    pub async fn unblock(&self, user: &mut User, peer: UserId) -> Result<()> {
        *user = self
            .store
            .update_blocklist(user.id, BlocklistOp::Remove(peer))
            .await?;
        info!("User {} unblocked {}", user.id.short_hex(), peer.short_hex());
        Ok(())
    }

    pub async fn unblock_all(&self, user: &mut User) -> Result<()> {
        *user = self.store.update_blocklist(user.id, BlocklistOp::Clear).await?;
        info!("User {} cleared its block set", user.id.short_hex());
        Ok(())
    }

    pub async fn is_registered(&self, user: UserId) -> Result<bool> {
        Ok(self.store.get_access(user).await?.is_some())
    }

    pub async fn record(&self, user: UserId) -> Result<Option<AccessRecord>> {
        Ok(self.store.get_access(user).await?)
    }

    /// Add `amount` to a user's invitation quota, registering the user if
    /// it has no access record yet.
    pub async fn grant_quota(&self, user: UserId, amount: u32) -> Result<InvitationQuota> {
        let quota = match self.store.get_access(user).await? {
            Some(record) => {
                let mut quota = record.quota;
                quota
                    .grant(amount)
                    .map_err(|e| WhisperError::validation(e.to_string()))?;
                self.store.update_access(user, quota).await?;
                quota
            }
            None => {
                let quota = InvitationQuota::new(amount);
                self.store.put_access(AccessRecord::new(user, quota)).await?;
                quota
            }
        };

        info!(
            "Granted {} invitations to {} ({} left)",
            amount,
            user.short_hex(),
            quota.left()
        );
        Ok(quota)
    }

    /// Mint a code good for `count` redemptions, debiting the inviter's
    /// quota by the same amount.
    pub async fn mint_invitation(
        &self,
        inviter: UserId,
        count: u32,
        prefix: &str,
    ) -> Result<Invitation> {
        if count < 1 {
            return Err(WhisperError::validation("invitation count must be positive"));
        }

        let record = self
            .store
            .get_access(inviter)
            .await?
            .ok_or_else(|| WhisperError::not_found("inviter has no access record"))?;

        let mut quota = record.quota;
        quota
            .debit(count)
            .map_err(|e| WhisperError::validation(e.to_string()))?;

        let code = self.unused_code(prefix).await?;
        let invitation = Invitation {
            code,
            inviter,
            usages: InvitationQuota::new(count),
        };

        self.store.put_invitation(invitation.clone()).await?;
        self.store.update_access(inviter, quota).await?;

        info!(
            "User {} minted invitation {} with {} usages",
            inviter.short_hex(),
            invitation.code,
            count
        );
        Ok(invitation)
    }

    /// Redeem `code` for `redeemer`, registering it with an empty quota.
    pub async fn redeem_invitation(&self, redeemer: UserId, code: &str) -> Result<()> {
        if self.is_registered(redeemer).await? {
            return Err(WhisperError::validation("user is already registered"));
        }

        let mut invitation = self
            .store
            .get_invitation(code)
            .await?
            .filter(|i| i.usages.left() > 0)
            .ok_or_else(|| WhisperError::not_found("invitation code"))?;

        let mut inviter = self
            .store
            .get_access(invitation.inviter)
            .await?
            .ok_or_else(|| WhisperError::not_found("inviter of invitation"))?;

        invitation
            .usages
            .debit(1)
            .map_err(|e| WhisperError::validation(e.to_string()))?;
        invitation
            .usages
            .record_use()
            .map_err(|e| WhisperError::validation(e.to_string()))?;
        inviter
            .quota
            .record_use()
            .map_err(|e| WhisperError::validation(e.to_string()))?;

        self.store.update_invitation(code, invitation.usages).await?;
        self.store.update_access(inviter.user_id, inviter.quota).await?;
        self.store
            .put_access(AccessRecord::new(redeemer, InvitationQuota::new(0)))
            .await?;

        info!(
            "User {} registered with invitation {} from {}",
            redeemer.short_hex(),
            code,
            inviter.user_id.short_hex()
        );
        Ok(())
    }

    pub async fn invitations_of(&self, inviter: UserId) -> Result<Vec<Invitation>> {
        Ok(self.store.list_invitations(inviter).await?)
    }

    async fn unused_code(&self, prefix: &str) -> Result<String> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_invitation_code(prefix);
            if self.store.get_invitation(&code).await?.is_none() {
                return Ok(code);
            }
            debug!("Invitation code collision, drawing again");
        }
        Err(WhisperError::collaborator("could not draw an unused invitation code"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use whisper_common::{AccountId, LinkKey, Timestamp};

    fn user(seed: u8) -> User {
        User::new(
            UserId::from_bytes([seed; 16]),
            AccountId(seed as i64),
            LinkKey(100_000 + seed as u32),
            Timestamp(1_700_000_000),
        )
    }

    async fn setup() -> (Arc<MemoryStore>, AccessControl<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let access = AccessControl::new(Arc::clone(&store));
        (store, access)
    }

    #[tokio::test]
    async fn test_block_symmetry_of_effect() {
        let (store, access) = setup().await;
        let mut a = user(1);
        let b = user(2);
        store.put_user(a.clone()).await.unwrap();
        store.put_user(b.clone()).await.unwrap();

        access.block(&mut a, b.id).await.unwrap();
        let b = store.get_user(b.id).await.unwrap().unwrap();

        assert_eq!(mutual_block_status(&a, &b), BlockStatus::BlockedBySender);
        assert_eq!(mutual_block_status(&b, &a), BlockStatus::BlockedByReceiver);
        // Only the blocking side is stored
        assert!(b.blocked.is_empty());
    }

    #[test]
    fn test_sender_block_takes_precedence() {
        let mut a = user(1);
        let mut b = user(2);
        a.blocked.insert(b.id);
        b.blocked.insert(a.id);
        assert_eq!(mutual_block_status(&a, &b), BlockStatus::BlockedBySender);
        assert_eq!(mutual_block_status(&b, &a), BlockStatus::BlockedBySender);
    }

    #[tokio::test]
    async fn test_block_ops_are_idempotent() {
        let (store, access) = setup().await;
        let mut a = user(1);
        let peer = UserId::from_bytes([2; 16]);
        store.put_user(a.clone()).await.unwrap();

        access.block(&mut a, peer).await.unwrap();
        access.block(&mut a, peer).await.unwrap();
        assert_eq!(a.blocked.len(), 1);

        access.unblock(&mut a, peer).await.unwrap();
        access.unblock(&mut a, peer).await.unwrap();
        assert!(a.blocked.is_empty());

        access.block(&mut a, peer).await.unwrap();
        access.unblock_all(&mut a).await.unwrap();
        let stored = store.get_user(a.id).await.unwrap().unwrap();
        assert!(stored.blocked.is_empty());
    }

    #[tokio::test]
    async fn test_grant_quota_registers() {
        let (_, access) = setup().await;
        let founder = UserId::from_bytes([9; 16]);

        assert!(!access.is_registered(founder).await.unwrap());
        access.grant_quota(founder, 3).await.unwrap();
        let quota = access.grant_quota(founder, 2).await.unwrap();

        assert!(access.is_registered(founder).await.unwrap());
        assert_eq!(quota.left(), 5);
    }

    #[tokio::test]
    async fn test_mint_debits_quota() {
        let (_, access) = setup().await;
        let inviter = UserId::from_bytes([9; 16]);
        access.grant_quota(inviter, 5).await.unwrap();

        let invitation = access.mint_invitation(inviter, 3, "whisper-").await.unwrap();
        assert!(invitation.code.starts_with("whisper-"));
        assert_eq!(invitation.usages.left(), 3);

        let record = access.record(inviter).await.unwrap().unwrap();
        assert_eq!(record.quota.left(), 2);
        assert_eq!(access.invitations_of(inviter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mint_over_quota_changes_nothing() {
        let (_, access) = setup().await;
        let inviter = UserId::from_bytes([9; 16]);
        access.grant_quota(inviter, 2).await.unwrap();

        let err = access.mint_invitation(inviter, 3, "whisper-").await.unwrap_err();
        assert!(matches!(err, WhisperError::Validation(_)));

        let record = access.record(inviter).await.unwrap().unwrap();
        assert_eq!(record.quota.left(), 2);
        assert!(access.invitations_of(inviter).await.unwrap().is_empty());

        let zero = access.mint_invitation(inviter, 0, "whisper-").await.unwrap_err();
        assert!(matches!(zero, WhisperError::Validation(_)));
    }

    #[tokio::test]
    async fn test_mint_without_record() {
        let (_, access) = setup().await;
        let err = access
            .mint_invitation(UserId::from_bytes([1; 16]), 1, "whisper-")
            .await
            .unwrap_err();
        assert!(matches!(err, WhisperError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_redeem_conserves_counters() {
        let (store, access) = setup().await;
        let inviter = UserId::from_bytes([9; 16]);
        let redeemer = UserId::from_bytes([1; 16]);
        access.grant_quota(inviter, 5).await.unwrap();
        let invitation = access.mint_invitation(inviter, 2, "whisper-").await.unwrap();

        access.redeem_invitation(redeemer, &invitation.code).await.unwrap();

        let after = store.get_invitation(&invitation.code).await.unwrap().unwrap();
        assert_eq!(after.usages.left(), 1);
        assert_eq!(after.usages.used(), 1);

        let inviter_record = access.record(inviter).await.unwrap().unwrap();
        assert_eq!(inviter_record.quota.used(), 1);
        assert_eq!(inviter_record.quota.left(), 3);

        let redeemer_record = access.record(redeemer).await.unwrap().unwrap();
        assert_eq!(redeemer_record.quota.left(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_code_is_rejected() {
        let (store, access) = setup().await;
        let inviter = UserId::from_bytes([9; 16]);
        access.grant_quota(inviter, 1).await.unwrap();
        let invitation = access.mint_invitation(inviter, 1, "whisper-").await.unwrap();

        access
            .redeem_invitation(UserId::from_bytes([1; 16]), &invitation.code)
            .await
            .unwrap();
        let err = access
            .redeem_invitation(UserId::from_bytes([2; 16]), &invitation.code)
            .await
            .unwrap_err();
        assert!(matches!(err, WhisperError::NotFound(_)));

        let after = store.get_invitation(&invitation.code).await.unwrap().unwrap();
        assert_eq!(after.usages.left(), 0);
        assert_eq!(after.usages.used(), 1);
    }

    #[tokio::test]
    async fn test_registered_user_cannot_redeem() {
        let (_, access) = setup().await;
        let inviter = UserId::from_bytes([9; 16]);
        access.grant_quota(inviter, 2).await.unwrap();
        let invitation = access.mint_invitation(inviter, 1, "whisper-").await.unwrap();

        let err = access
            .redeem_invitation(inviter, &invitation.code)
            .await
            .unwrap_err();
        assert!(matches!(err, WhisperError::Validation(_)));
    }
}
