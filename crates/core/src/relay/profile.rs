/// Links, usernames, language and info

use super::{CallbackContext, IncomingMessage, Relay, Session};
use crate::callback::CallbackAction;
use crate::i18n::{Catalog, TextId};
use crate::identity::validate_username;
use crate::store::{InvitationStore, UserStore, UserUpdate};
use crate::transport::{Button, Transport};
use whisper_common::config::protocol::USERNAME_MARKER;
use whisper_common::{Locale, Result, State, WhisperError};

fn language_name(locale: Locale) -> &'static str {
    match locale {
        Locale::EnUs => "English",
        Locale::FaIr => "فارسی",
    }
}

impl<S, T, C> Relay<S, T, C>
where
    S: UserStore + InvitationStore,
    T: Transport,
    C: Catalog,
{
    /// `/info`
    pub async fn info(&self, session: &mut Session) -> Result<()> {
        let text = self.text(session, TextId::Info);
        self.say(session, &text, None, None).await?;
        self.reset(session).await
    }

    /// `/link`: the generic link and, with a username, the username link
    pub async fn link(&self, session: &mut Session, msg: &IncomingMessage) -> Result<()> {
        if self.config.gated && !self.access.is_registered(session.user.id).await? {
            let text = self.text(session, TextId::NotRegistered);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        }

        let token = self
            .codec
            .encode(session.user.link_key, session.user.created_at)
            .map_err(|e| WhisperError::Other(anyhow::Error::new(e).context("encoding link token")))?;
        let generic = self.deep_link(&token);

        let header = self.text(session, TextId::Link);
        let text = match &session.user.username {
            Some(username) => {
                let by_name = self.deep_link(&format!("{}{}", USERNAME_MARKER, username));
                let or = self.text(session, TextId::Or);
                format!("{}\n{}\n\n{}\n\n{}", header, by_name, or, generic)
            }
            None => format!("{}\n{}", header, generic),
        };

        self.say(session, &text, Some(msg.message), None).await?;
        self.reset(session).await
    }

    /// `/username`
    pub async fn manage_username(&self, session: &mut Session) -> Result<()> {
        let locale = session.locale;
        let cancel = self.button(locale, TextId::CancelButton, CallbackAction::CancelUsername)?;

        let (text, row) = match &session.user.username {
            Some(username) => (
                self.format(session, TextId::YourCurrentUsername, &[username.as_str()]),
                vec![
                    self.button(locale, TextId::ChangeUsernameButton, CallbackAction::SetUsername)?,
                    self.button(locale, TextId::RemoveUsernameButton, CallbackAction::RemoveUsername)?,
                    cancel,
                ],
            ),
            None => (
                self.text(session, TextId::NoUsername),
                vec![
                    self.button(locale, TextId::SetUsernameButton, CallbackAction::SetUsername)?,
                    cancel,
                ],
            ),
        };

        self.say(session, &text, None, Some(vec![row])).await?;
        Ok(())
    }

    pub(super) async fn username_action(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
        action: CallbackAction,
    ) -> Result<()> {
        self.clear_buttons(session, cb).await?;

        match action {
            CallbackAction::SetUsername => {
                self.transition(session, UserUpdate::enter(State::SettingUsername))
                    .await?;
                let text = format!(
                    "{}\n\n{}",
                    self.text(session, TextId::UsernameExplanation),
                    self.text(session, TextId::EnterNewUsername)
                );
                self.say(session, &text, Some(cb.message), None).await?;
                let alert = self.text(session, TextId::SettingUsername);
                self.answer(cb, &alert, false).await
            }
            CallbackAction::RemoveUsername => {
                self.transition(session, UserUpdate::reset().username(None))
                    .await?;
                let text = self.text(session, TextId::UsernameRemoved);
                self.say(session, &text, Some(cb.message), None).await?;
                self.answer(cb, &text, false).await
            }
            _ => {
                let text = self.text(session, TextId::NeverMind);
                self.answer(cb, &text, false).await
            }
        }
    }

    /// Free text while `SettingUsername`
    pub(super) async fn submit_username(
        &self,
        session: &mut Session,
        msg: &IncomingMessage,
    ) -> Result<()> {
        let valid = msg
            .text
            .as_deref()
            .and_then(|text| validate_username(text.trim()).ok());
        let Some(username) = valid else {
            let text = self.text(session, TextId::InvalidUsername);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        };

        match self.store.get_user_by_username(&username).await? {
            None => {
                self.transition(session, UserUpdate::reset().username(Some(username.clone())))
                    .await?;
                let text = self.format(session, TextId::UsernameSet, &[username.as_str()]);
                self.say(session, &text, Some(msg.message), None).await?;
            }
            Some(owner) if owner.id == session.user.id => {
                self.reset(session).await?;
                let text = self.text(session, TextId::SameUsername);
                self.say(session, &text, Some(msg.message), None).await?;
            }
            Some(_) => {
                let text = self.text(session, TextId::UsernameExists);
                self.say(session, &text, Some(msg.message), None).await?;
            }
        }
        Ok(())
    }

    /// `/language`
    pub async fn manage_language(&self, session: &mut Session) -> Result<()> {
        let text = match session.user.locale {
            Some(locale) => self.format(session, TextId::YourLanguage, &[language_name(locale)]),
            None => self.text(session, TextId::NoPreferredLanguage),
        };

        let mut row = Vec::with_capacity(Locale::ALL.len() + 1);
        for locale in Locale::ALL {
            row.push(Button::new(
                language_name(locale),
                CallbackAction::SetLanguage(locale).encode()?,
            ));
        }
        row.push(self.button(session.locale, TextId::CancelButton, CallbackAction::CancelLanguage)?);

        self.say(session, &text, None, Some(vec![row])).await?;
        Ok(())
    }

    pub(super) async fn language_action(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
        action: CallbackAction,
    ) -> Result<()> {
        self.clear_buttons(session, cb).await?;

        match action {
            CallbackAction::SetLanguage(locale) => {
                self.transition(session, UserUpdate::reset().locale(Some(locale)))
                    .await?;
                session.locale = locale;

                let text = self.text(session, TextId::LanguageUpdated);
                self.say(session, &text, Some(cb.message), None).await?;
                let alert = self.text(session, TextId::LanguageUpdatedAlert);
                self.answer(cb, &alert, false).await
            }
            _ => {
                let text = self.text(session, TextId::NeverMind);
                self.answer(cb, &text, false).await
            }
        }
    }

    fn deep_link(&self, start: &str) -> String {
        format!("https://t.me/{}?start={}", self.config.bot_username, start)
    }
}
