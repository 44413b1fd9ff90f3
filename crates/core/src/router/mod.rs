/// Command router
///
/// Entry point for every inbound event: resolves (or creates) the acting
/// user, resolves its locale, classifies the event and dispatches it to the
/// relay. Errors are sorted here into the ones answered in chat, the ones
/// dropped silently and the ones surfaced to the caller.

pub mod command;

pub use command::Command;

use crate::callback::CallbackAction;
use crate::i18n::Catalog;
use crate::identity::{generate_user_id, random_link_key, LinkError};
use crate::relay::{CallbackContext, IncomingMessage, Relay, Session};
use crate::store::{InvitationStore, User, UserStore};
use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use whisper_common::{
    AccountId, Founder, Locale, MessageRef, RelayConfig, Result, State, Timestamp, WhisperError,
};

/// Attempts at drawing an unused link key for a new user
const MAX_LINK_KEY_ATTEMPTS: usize = 8;

/// One inbound platform event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub account_id: AccountId,

    /// Two-letter language reported by the client
    #[serde(default)]
    pub language_code: Option<String>,

    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message {
        message_id: MessageRef,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        reply_to: Option<MessageRef>,
    },
    Callback {
        callback_id: String,
        message_id: MessageRef,
        data: String,
        #[serde(default)]
        reply_to: Option<MessageRef>,
    },
}

/// What became of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Handled,
    /// Untrusted payload, ignored without a reply
    Dropped,
}

pub struct CommandRouter<S, T, C> {
    relay: Relay<S, T, C>,
}

impl<S, T, C> CommandRouter<S, T, C>
where
    S: UserStore + InvitationStore,
    T: Transport,
    C: Catalog,
{
    pub fn new(
        store: Arc<S>,
        transport: Arc<T>,
        catalog: Arc<C>,
        config: Arc<RelayConfig>,
    ) -> std::result::Result<Self, LinkError> {
        Ok(Self {
            relay: Relay::new(store, transport, catalog, config)?,
        })
    }

    pub fn relay(&self) -> &Relay<S, T, C> {
        &self.relay
    }

    /// Handle one inbound event
    pub async fn route(&self, event: InboundEvent) -> Result<Outcome> {
        let user = self.acting_user(event.account_id).await?;
        let locale = Locale::resolve(
            user.locale,
            event.language_code.as_deref(),
            self.relay.config().default_locale,
        );
        let mut session = Session::new(user, locale);

        let reply_to = match &event.kind {
            EventKind::Message { message_id, .. } => Some(*message_id),
            EventKind::Callback { .. } => None,
        };

        let result = match event.kind {
            EventKind::Message {
                message_id,
                text,
                reply_to,
            } => {
                let msg = IncomingMessage {
                    message: message_id,
                    text,
                    reply_to,
                };
                self.dispatch_message(&mut session, msg).await
            }
            EventKind::Callback {
                callback_id,
                message_id,
                data,
                reply_to,
            } => {
                let action = match CallbackAction::parse(&data) {
                    Ok(action) => action,
                    Err(e) => {
                        warn!(
                            "Dropping callback {:?} from {}: {}",
                            data,
                            session.user.id.short_hex(),
                            e
                        );
                        return Ok(Outcome::Dropped);
                    }
                };
                let cb = CallbackContext {
                    callback_id,
                    message: message_id,
                    reply_to,
                };
                self.dispatch_callback(&mut session, action, cb).await
            }
        };

        match result {
            Ok(()) => Ok(Outcome::Handled),
            Err(e) if e.is_untrusted_payload() => {
                warn!(
                    "Dropping event from {}: {}",
                    session.user.id.short_hex(),
                    e
                );
                Ok(Outcome::Dropped)
            }
            Err(e) if e.is_recoverable() => {
                debug!("Recoverable error for {}: {}", session.user.id.short_hex(), e);
                self.relay
                    .reply_error(&session, reply_to, &e.to_string())
                    .await?;
                Ok(Outcome::Handled)
            }
            Err(e) => {
                error!(
                    "Failed to handle event from {}: {}",
                    session.user.id.short_hex(),
                    e
                );
                Err(e)
            }
        }
    }

    /// Register a founder with its invitation quota unless it already has
    /// an access record
    pub async fn seed_founder(&self, founder: &Founder) -> Result<User> {
        let user = self.acting_user(founder.account_id).await?;
        let access = self.relay.access();

        if access.record(user.id).await?.is_none() {
            access.grant_quota(user.id, founder.quota).await?;
            info!(
                "Seeded founder {} with {} invitations",
                user.id.short_hex(),
                founder.quota
            );
        }
        Ok(user)
    }

    async fn dispatch_message(&self, session: &mut Session, msg: IncomingMessage) -> Result<()> {
        let command = msg.text.as_deref().and_then(Command::parse);
        let Some(command) = command else {
            debug!(
                "Free text from {} in state {:?}",
                session.user.id.short_hex(),
                session.user.state
            );
            return self.relay.handle_message(session, &msg).await;
        };

        debug!("Command /{} from {}", command.name(), session.user.id.short_hex());
        match command {
            Command::Start(arg) => self.relay.start(session, arg.as_deref(), &msg).await,
            Command::Info => self.relay.info(session).await,
            Command::Link => self.relay.link(session, &msg).await,
            Command::Username => self.relay.manage_username(session).await,
            Command::Language => self.relay.manage_language(session).await,
            Command::Invite => self.relay.invite(session, &msg).await,
            Command::Register => self.relay.register(session, &msg).await,
            Command::UnblockAll => self.relay.unblock_all(session, &msg).await,
        }
    }

    async fn dispatch_callback(
        &self,
        session: &mut Session,
        action: CallbackAction,
        cb: CallbackContext,
    ) -> Result<()> {
        debug!("Callback {} from {}", action, session.user.id.short_hex());

        // Stale relay context never leaks into an unrelated action
        if session.user.state != State::Idle || session.user.has_relay_context() {
            self.relay.reset(session).await?;
        }

        self.relay.handle_callback(session, action, &cb).await
    }

    async fn acting_user(&self, account_id: AccountId) -> Result<User> {
        let store = self.relay.store();
        if let Some(user) = store.get_user_by_account(account_id).await? {
            return Ok(user);
        }

        let created_at = Timestamp::now();
        for _ in 0..MAX_LINK_KEY_ATTEMPTS {
            let link_key = random_link_key();
            if store.get_user_by_link(link_key, created_at).await?.is_some() {
                debug!("Link key collision, drawing again");
                continue;
            }

            let user = User::new(generate_user_id(), account_id, link_key, created_at);
            store.put_user(user.clone()).await?;
            info!("Created user {} for account {}", user.id.short_hex(), account_id);
            return Ok(user);
        }

        Err(WhisperError::collaborator("could not draw an unused link key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{BuiltinCatalog, TextId};
    use crate::store::MemoryStore;
    use crate::transport::{Outbound, RecordingTransport};

    const ALPHABET: &str = "k3G7QAe51FCsPW92uEOyq4Bg6Sp8YzVTmnU0liwDdHXLajZrfxNhobJIRcMvKt";

    fn router() -> (
        CommandRouter<MemoryStore, RecordingTransport, BuiltinCatalog>,
        Arc<MemoryStore>,
        Arc<RecordingTransport>,
    ) {
        let store = Arc::new(MemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let config = RelayConfig::new().with_link_alphabet(ALPHABET);
        let router = CommandRouter::new(
            Arc::clone(&store),
            Arc::clone(&transport),
            Arc::new(BuiltinCatalog),
            Arc::new(config),
        )
        .unwrap();
        (router, store, transport)
    }

    fn message(account: i64, id: i64, text: &str) -> InboundEvent {
        InboundEvent {
            account_id: AccountId(account),
            language_code: None,
            kind: EventKind::Message {
                message_id: MessageRef(id),
                text: Some(text.to_string()),
                reply_to: None,
            },
        }
    }

    #[tokio::test]
    async fn test_first_event_creates_user() {
        let (router, store, _) = router();

        router.route(message(10, 1, "/info")).await.unwrap();
        router.route(message(10, 2, "/info")).await.unwrap();

        assert_eq!(store.user_count().await, 1);
        let user = store.get_user_by_account(AccountId(10)).await.unwrap().unwrap();
        assert_eq!(user.state, State::Idle);
        assert!(user.username.is_none());
    }

    #[tokio::test]
    async fn test_free_text_in_idle_is_invalid_command() {
        let (router, _, transport) = router();

        let outcome = router.route(message(10, 1, "hello")).await.unwrap();
        assert_eq!(outcome, Outcome::Handled);

        let texts = transport.texts_to(AccountId(10)).await;
        assert_eq!(texts, vec!["Error: Invalid command!".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_command_is_free_text() {
        let (router, _, transport) = router();

        router.route(message(10, 1, "/frobnicate")).await.unwrap();
        let texts = transport.texts_to(AccountId(10)).await;
        assert_eq!(texts, vec!["Error: Invalid command!".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_callback_is_dropped() {
        let (router, store, transport) = router();

        let event = InboundEvent {
            account_id: AccountId(10),
            language_code: None,
            kind: EventKind::Callback {
                callback_id: "cb-1".to_string(),
                message_id: MessageRef(5),
                data: "x|".to_string(),
                reply_to: None,
            },
        };
        let outcome = router.route(event).await.unwrap();

        assert_eq!(outcome, Outcome::Dropped);
        assert!(transport.outbound().await.is_empty());
        let user = store.get_user_by_account(AccountId(10)).await.unwrap().unwrap();
        assert_eq!(user.state, State::Idle);
    }

    #[tokio::test]
    async fn test_malformed_link_token_is_dropped() {
        let (router, _, transport) = router();

        let outcome = router.route(message(10, 1, "/start !!")).await.unwrap();
        assert_eq!(outcome, Outcome::Dropped);
        assert!(transport.outbound().await.is_empty());
    }

    #[tokio::test]
    async fn test_callback_resets_stale_state() {
        let (router, store, _) = router();

        router.route(message(10, 1, "/register")).await.unwrap();
        let user = store.get_user_by_account(AccountId(10)).await.unwrap().unwrap();
        assert_eq!(user.state, State::AwaitingInvitationCode);

        let event = InboundEvent {
            account_id: AccountId(10),
            language_code: None,
            kind: EventKind::Callback {
                callback_id: "cb-2".to_string(),
                message_id: MessageRef(7),
                data: CallbackAction::CancelLanguage.encode().unwrap(),
                reply_to: None,
            },
        };
        assert_eq!(router.route(event).await.unwrap(), Outcome::Handled);

        let user = store.get_user_by_account(AccountId(10)).await.unwrap().unwrap();
        assert_eq!(user.state, State::Idle);
    }

    #[tokio::test]
    async fn test_client_language_selects_catalog() {
        let (router, _, transport) = router();

        let mut event = message(10, 1, "hello");
        event.language_code = Some("fa".to_string());
        router.route(event).await.unwrap();

        let english = BuiltinCatalog.text(Locale::EnUs, TextId::InvalidCommand);
        let texts = transport.texts_to(AccountId(10)).await;
        assert_eq!(texts.len(), 1);
        assert!(!texts[0].contains(&english));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (router, store, _) = router();
        store.set_unavailable(true);

        let err = router.route(message(10, 1, "/info")).await.unwrap_err();
        assert!(matches!(err, WhisperError::Collaborator(_)));
    }

    #[tokio::test]
    async fn test_seed_founder_is_idempotent() {
        let (router, _, transport) = router();
        let founder = Founder {
            account_id: AccountId(1),
            quota: 5,
        };

        let user = router.seed_founder(&founder).await.unwrap();
        router.seed_founder(&founder).await.unwrap();

        let record = router.relay().access().record(user.id).await.unwrap().unwrap();
        assert_eq!(record.quota.left(), 5);
        assert!(transport.outbound().await.is_empty());
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{
            "account_id": 42,
            "kind": {"message": {"message_id": 7, "text": "/start"}}
        }"#;
        let event: InboundEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.account_id, AccountId(42));
        assert_eq!(event.language_code, None);
        assert_eq!(
            event.kind,
            EventKind::Message {
                message_id: MessageRef(7),
                text: Some("/start".to_string()),
                reply_to: None,
            }
        );
    }

    #[tokio::test]
    async fn test_sender_sees_reaction_on_relay() {
        let (router, store, transport) = router();

        router.route(message(20, 1, "/info")).await.unwrap();
        let receiver = store.get_user_by_account(AccountId(20)).await.unwrap().unwrap();
        let token = router
            .relay()
            .codec()
            .encode(receiver.link_key, receiver.created_at)
            .unwrap();

        router
            .route(message(10, 2, &format!("/start {}", token)))
            .await
            .unwrap();
        transport.take().await;
        router.route(message(10, 3, "hello")).await.unwrap();

        let outbound = transport.outbound().await;
        assert!(matches!(
            &outbound[0],
            Outbound::Reaction { chat, message, .. } if *chat == AccountId(10) && *message == MessageRef(3)
        ));
    }
}
