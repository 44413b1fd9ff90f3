/// Relay state machine
///
/// Owns each user's conversational state and the transitions that open,
/// thread and close an anonymous exchange. Every handler receives the
/// acting user's [`Session`], which carries the locale resolved for this
/// event.

mod exchange;
mod invitations;
mod profile;

use crate::access::AccessControl;
use crate::callback::CallbackAction;
use crate::i18n::{Catalog, TextId};
use crate::identity::{LinkCodec, LinkError};
use crate::store::{InvitationStore, User, UserStore, UserUpdate};
use crate::transport::{Button, Keyboard, SendOptions, Transport};
use std::sync::Arc;
use whisper_common::{AccountId, Locale, MessageRef, RelayConfig, Result, State};

/// Reaction confirming a message was captured for relay
pub const SENT_REACTION: &str = "🕊";

/// Reaction telling the sender its message was opened
pub const OPENED_REACTION: &str = "👀";

/// The acting user of one inbound event
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub locale: Locale,
}

impl Session {
    pub fn new(user: User, locale: Locale) -> Self {
        Self { user, locale }
    }

    /// Private chat of the acting user
    pub fn chat(&self) -> AccountId {
        self.user.account_id
    }
}

/// An inbound chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub message: MessageRef,
    /// Absent for media
    pub text: Option<String>,
    pub reply_to: Option<MessageRef>,
}

/// An inbound button press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackContext {
    pub callback_id: String,
    /// Message carrying the pressed button
    pub message: MessageRef,
    /// Message the button's message replies to
    pub reply_to: Option<MessageRef>,
}

pub struct Relay<S, T, C> {
    store: Arc<S>,
    transport: Arc<T>,
    catalog: Arc<C>,
    codec: LinkCodec,
    access: AccessControl<S>,
    config: Arc<RelayConfig>,
}

impl<S, T, C> Relay<S, T, C>
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
        let codec = LinkCodec::new(&config.link_alphabet)?;
        let access = AccessControl::new(Arc::clone(&store));

        Ok(Self {
            store,
            transport,
            catalog,
            codec,
            access,
            config,
        })
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn access(&self) -> &AccessControl<S> {
        &self.access
    }

    pub fn codec(&self) -> &LinkCodec {
        &self.codec
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Free text or media, interpreted by the current state
    pub async fn handle_message(&self, session: &mut Session, msg: &IncomingMessage) -> Result<()> {
        match session.user.state {
            State::Sending => self.send(session, msg).await,
            State::SettingUsername => self.submit_username(session, msg).await,
            State::GeneratingInvitation => self.submit_invitation_count(session, msg).await,
            State::AwaitingInvitationCode => self.submit_invitation_code(session, msg).await,
            State::Idle => {
                let invalid = self.text(session, TextId::InvalidCommand);
                self.reply_error(session, Some(msg.message), &invalid).await
            }
        }
    }

    pub async fn handle_callback(
        &self,
        session: &mut Session,
        action: CallbackAction,
        cb: &CallbackContext,
    ) -> Result<()> {
        match action {
            CallbackAction::Reply {
                peer,
                message,
                delivery,
            } => self.start_reply(session, cb, peer, message, delivery).await,
            CallbackAction::Block { peer, message } => {
                self.block_peer(session, cb, peer, message).await
            }
            CallbackAction::Unblock { peer, message } => {
                self.unblock_peer(session, cb, peer, message).await
            }
            CallbackAction::Open {
                sender,
                message,
                placeholder,
            } => self.open(session, cb, sender, message, placeholder).await,
            CallbackAction::SetUsername
            | CallbackAction::RemoveUsername
            | CallbackAction::CancelUsername => self.username_action(session, cb, action).await,
            CallbackAction::SetLanguage(_) | CallbackAction::CancelLanguage => {
                self.language_action(session, cb, action).await
            }
            CallbackAction::GenerateInvitation => self.begin_invitation(session, cb).await,
            CallbackAction::CancelInvitationCode => self.cancel_registration(session, cb).await,
        }
    }

    /// Back to `Idle` with the relay fields cleared. Idempotent.
    pub async fn reset(&self, session: &mut Session) -> Result<()> {
        self.transition(session, UserUpdate::reset()).await
    }

    /// Reply with the localized "Error: ..." text
    pub async fn reply_error(
        &self,
        session: &Session,
        reply_to: Option<MessageRef>,
        reason: &str,
    ) -> Result<()> {
        let text = self.format(session, TextId::Error, &[reason]);
        self.transport
            .send_text(session.chat(), &text, SendOptions::new().reply_to(reply_to))
            .await?;
        Ok(())
    }

    async fn transition(&self, session: &mut Session, update: UserUpdate) -> Result<()> {
        session.user = self.store.update_user(session.user.id, update).await?;
        Ok(())
    }

    fn text(&self, session: &Session, id: TextId) -> String {
        self.catalog.text(session.locale, id)
    }

    fn format(&self, session: &Session, id: TextId, args: &[&str]) -> String {
        self.catalog.format(session.locale, id, args)
    }

    fn button(&self, locale: Locale, id: TextId, action: CallbackAction) -> Result<Button> {
        Ok(Button::new(self.catalog.text(locale, id), action.encode()?))
    }

    /// Send `text` to the acting user, optionally threaded and with buttons
    async fn say(
        &self,
        session: &Session,
        text: &str,
        reply_to: Option<MessageRef>,
        keyboard: Option<Keyboard>,
    ) -> Result<MessageRef> {
        let mut options = SendOptions::new().reply_to(reply_to);
        options.keyboard = keyboard;
        Ok(self.transport.send_text(session.chat(), text, options).await?)
    }

    async fn answer(&self, cb: &CallbackContext, text: &str, show_alert: bool) -> Result<()> {
        self.transport
            .answer_callback(&cb.callback_id, text, show_alert)
            .await?;
        Ok(())
    }

    async fn clear_buttons(&self, session: &Session, cb: &CallbackContext) -> Result<()> {
        self.transport
            .edit_buttons(session.chat(), cb.message, None)
            .await?;
        Ok(())
    }
}
