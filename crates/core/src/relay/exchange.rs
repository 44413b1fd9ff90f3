/// Opening, relaying and threading anonymous messages, plus blocking

use super::{CallbackContext, IncomingMessage, Relay, Session, OPENED_REACTION, SENT_REACTION};
use crate::access::{mutual_block_status, BlockStatus};
use crate::callback::CallbackAction;
use crate::i18n::{Catalog, TextId};
use crate::identity::resolve_identity;
use crate::store::{InvitationStore, User, UserStore, UserUpdate};
use crate::transport::{Keyboard, SendOptions, Transport};
use tracing::{info, warn};
use whisper_common::config::protocol::USERNAME_MARKER;
use whisper_common::{Locale, MessageRef, Result, UserId};

impl<S, T, C> Relay<S, T, C>
where
    S: UserStore + InvitationStore,
    T: Transport,
    C: Catalog,
{
    /// `/start` without an argument greets; with one it addresses a peer
    pub async fn start(
        &self,
        session: &mut Session,
        arg: Option<&str>,
        msg: &IncomingMessage,
    ) -> Result<()> {
        let Some(arg) = arg else {
            self.reset(session).await?;
            let welcome = self.text(session, TextId::Start);
            self.say(session, &welcome, None, None).await?;
            return Ok(());
        };

        let Some(peer) = resolve_identity(self.store.as_ref(), &self.codec, arg).await? else {
            let text = self.text(session, TextId::UserNotFound);
            self.say(session, &text, None, None).await?;
            return Ok(());
        };

        if peer.id == session.user.id {
            let text = self.text(session, TextId::MessageToYourself);
            self.say(session, &text, None, None).await?;
            return Ok(());
        }

        match mutual_block_status(&session.user, &peer) {
            BlockStatus::BlockedBySender => {
                let unblock = self.button(
                    session.locale,
                    TextId::UnblockButton,
                    CallbackAction::Unblock {
                        peer: peer.id,
                        message: None,
                    },
                )?;
                let text = self.text(session, TextId::YouHaveBlockedThisUser);
                self.say(session, &text, Some(msg.message), Some(vec![vec![unblock]]))
                    .await?;
                return Ok(());
            }
            BlockStatus::BlockedByReceiver => {
                let text = self.text(session, TextId::ThisUserHasBlockedYou);
                self.say(session, &text, Some(msg.message), None).await?;
                return Ok(());
            }
            BlockStatus::None => {}
        }

        self.transition(session, UserUpdate::sending(peer.id, None, None))
            .await?;

        let label = if arg.starts_with(USERNAME_MARKER) {
            peer.username.clone().unwrap_or_default()
        } else {
            arg.to_string()
        };
        let prompt = self.format(session, TextId::InitialSendPrompt, &[label.as_str()]);
        self.say(session, &prompt, None, None).await?;
        Ok(())
    }

    /// Relay the message of a user in `Sending` to its contact
    pub(super) async fn send(&self, session: &mut Session, msg: &IncomingMessage) -> Result<()> {
        let receiver = match session.user.contact {
            Some(contact) => self.store.get_user(contact).await?,
            None => None,
        };
        let Some(receiver) = receiver else {
            self.reset(session).await?;
            let text = self.text(session, TextId::UserNotFound);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        };

        let reason = match mutual_block_status(&session.user, &receiver) {
            BlockStatus::BlockedBySender => Some(TextId::YouHaveBlockedThisUser),
            BlockStatus::BlockedByReceiver => Some(TextId::ThisUserHasBlockedYou),
            BlockStatus::None => None,
        };
        if let Some(reason) = reason {
            let text = self.text(session, reason);
            self.say(session, &text, Some(msg.message), None).await?;
            self.reset(session).await?;
            return Ok(());
        }

        self.transport
            .react_to(session.chat(), msg.message, SENT_REACTION)
            .await?;

        let sent = self.text(session, TextId::MessageSent);
        let placeholder = self.say(session, &sent, Some(msg.message), None).await?;

        let receiver_locale = self.locale_of(&receiver);
        let notice = if session.user.reply_message.is_some() {
            TextId::NewReply
        } else {
            TextId::NewMessage
        };
        let open = self.button(
            receiver_locale,
            TextId::OpenMessageButton,
            CallbackAction::Open {
                sender: session.user.id,
                message: msg.message,
                placeholder: Some(placeholder),
            },
        )?;
        let options = SendOptions::new()
            .reply_to(session.user.reply_message)
            .keyboard(vec![vec![open]]);
        self.transport
            .send_text(
                receiver.account_id,
                &self.catalog.text(receiver_locale, notice),
                options,
            )
            .await?;

        if let Some(delivery) = session.user.delivery_message {
            if let Err(e) = self
                .transport
                .delete_message(receiver.account_id, delivery)
                .await
            {
                warn!("Failed to retract placeholder {}: {}", delivery, e);
            }
        }

        info!(
            "Relayed message from {} to {}",
            session.user.id.short_hex(),
            receiver.id.short_hex()
        );
        self.reset(session).await
    }

    /// Reveal a relayed message to its receiver
    pub(super) async fn open(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
        sender_id: UserId,
        message: MessageRef,
        placeholder: Option<MessageRef>,
    ) -> Result<()> {
        let Some(sender) = self.store.get_user(sender_id).await? else {
            let text = self.text(session, TextId::UserNotFound);
            return self.answer(cb, &text, true).await;
        };

        let opened = self.text(session, TextId::MessageOpened);
        self.answer(cb, &opened, false).await?;

        let keyboard = self.reply_block_keyboard(session.locale, sender.id, Some(message), placeholder)?;
        self.transport
            .copy_message(
                session.chat(),
                sender.account_id,
                message,
                SendOptions::new().reply_to(cb.reply_to).keyboard(keyboard),
            )
            .await?;

        if let Err(e) = self
            .transport
            .react_to(sender.account_id, message, OPENED_REACTION)
            .await
        {
            warn!("Failed to mark message {} as opened: {}", message, e);
        }

        if let Err(e) = self.transport.delete_message(session.chat(), cb.message).await {
            warn!("Failed to delete notification {}: {}", cb.message, e);
        }

        Ok(())
    }

    /// Enter `Sending` towards the author of a received message
    pub(super) async fn start_reply(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
        peer_id: UserId,
        message: Option<MessageRef>,
        delivery: Option<MessageRef>,
    ) -> Result<()> {
        let Some(peer) = self.store.get_user(peer_id).await? else {
            let text = self.text(session, TextId::UserNotFound);
            return self.answer(cb, &text, true).await;
        };

        match mutual_block_status(&session.user, &peer) {
            BlockStatus::BlockedBySender => {
                self.transport
                    .edit_buttons(
                        session.chat(),
                        cb.message,
                        Some(self.unblock_keyboard(session.locale, peer.id, message)?),
                    )
                    .await?;
                let text = self.text(session, TextId::YouHaveBlockedThisUser);
                return self.answer(cb, &text, true).await;
            }
            BlockStatus::BlockedByReceiver => {
                let text = self.text(session, TextId::ThisUserHasBlockedYou);
                return self.answer(cb, &text, true).await;
            }
            BlockStatus::None => {}
        }

        self.transition(session, UserUpdate::sending(peer.id, message, delivery))
            .await?;

        let replying = self.text(session, TextId::ReplyingToMessage);
        self.answer(cb, &replying, false).await?;
        let prompt = self.text(session, TextId::ReplyToThisMessage);
        self.say(session, &prompt, Some(cb.message), None).await?;
        Ok(())
    }

    pub(super) async fn block_peer(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
        peer: UserId,
        message: Option<MessageRef>,
    ) -> Result<()> {
        self.access.block(&mut session.user, peer).await?;

        let text = self.text(session, TextId::UserBlocked);
        self.answer(cb, &text, false).await?;

        let keyboard = self.unblock_keyboard(session.locale, peer, message)?;
        self.transport
            .edit_buttons(session.chat(), cb.message, Some(keyboard))
            .await?;
        Ok(())
    }

    pub(super) async fn unblock_peer(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
        peer: UserId,
        message: Option<MessageRef>,
    ) -> Result<()> {
        self.access.unblock(&mut session.user, peer).await?;

        let text = self.text(session, TextId::UserUnblocked);
        self.answer(cb, &text, false).await?;

        let keyboard = self.reply_block_keyboard(session.locale, peer, message, None)?;
        self.transport
            .edit_buttons(session.chat(), cb.message, Some(keyboard))
            .await?;
        Ok(())
    }

    /// `/unblockall`
    pub async fn unblock_all(&self, session: &mut Session, msg: &IncomingMessage) -> Result<()> {
        self.access.unblock_all(&mut session.user).await?;
        let text = self.text(session, TextId::UnblockAllResult);
        self.say(session, &text, Some(msg.message), None).await?;
        Ok(())
    }

    fn locale_of(&self, user: &User) -> Locale {
        user.locale.unwrap_or(self.config.default_locale)
    }

    /// Reply (or "Send message" for a fresh exchange) next to Block
    fn reply_block_keyboard(
        &self,
        locale: Locale,
        peer: UserId,
        message: Option<MessageRef>,
        delivery: Option<MessageRef>,
    ) -> Result<Keyboard> {
        let reply_label = if message.is_some() {
            TextId::ReplyButton
        } else {
            TextId::SendMessageButton
        };
        let reply = self.button(
            locale,
            reply_label,
            CallbackAction::Reply {
                peer,
                message,
                delivery,
            },
        )?;
        let block = self.button(
            locale,
            TextId::BlockButton,
            CallbackAction::Block { peer, message },
        )?;
        Ok(vec![vec![reply, block]])
    }

    fn unblock_keyboard(
        &self,
        locale: Locale,
        peer: UserId,
        message: Option<MessageRef>,
    ) -> Result<Keyboard> {
        let unblock = self.button(
            locale,
            TextId::UnblockButton,
            CallbackAction::Unblock { peer, message },
        )?;
        Ok(vec![vec![unblock]])
    }
}
