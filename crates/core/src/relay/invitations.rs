/// Invitation listing, minting and redemption

use super::{CallbackContext, IncomingMessage, Relay, Session};
use crate::callback::CallbackAction;
use crate::i18n::{Catalog, TextId};
use crate::store::{InvitationStore, UserStore, UserUpdate};
use crate::transport::{Keyboard, Transport};
use std::fmt::Write;
use whisper_common::{Result, State};

impl<S, T, C> Relay<S, T, C>
where
    S: UserStore + InvitationStore,
    T: Transport,
    C: Catalog,
{
    /// `/invite`: quota summary and the codes minted so far
    pub async fn invite(&self, session: &mut Session, msg: &IncomingMessage) -> Result<()> {
        let Some(record) = self.access.record(session.user.id).await? else {
            let text = self.text(session, TextId::NoInvitations);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        };

        let invitations = self.access.invitations_of(session.user.id).await?;

        let left = record.quota.left().to_string();
        let used = record.quota.used().to_string();
        let mut text = self.format(session, TextId::InvitationSummary, &[left.as_str(), used.as_str()]);
        text.push_str("\n\n");
        if invitations.is_empty() {
            text.push_str(&self.text(session, TextId::NoGeneratedCodes));
        } else {
            let count = invitations.len().to_string();
            text.push_str(&self.format(session, TextId::GeneratedCodes, &[count.as_str()]));
            for invitation in &invitations {
                let _ = write!(
                    text,
                    "\n{} {}/{}",
                    invitation.code,
                    invitation.usages.used(),
                    invitation.usages.left()
                );
            }
        }

        let keyboard = if record.quota.left() > 0 {
            Some(vec![vec![self.button(
                session.locale,
                TextId::GenerateCodeButton,
                CallbackAction::GenerateInvitation,
            )?]])
        } else {
            None
        };

        self.say(session, &text, Some(msg.message), keyboard).await?;
        Ok(())
    }

    /// "Generate code" button: ask for the number of usages
    pub(super) async fn begin_invitation(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
    ) -> Result<()> {
        self.clear_buttons(session, cb).await?;

        let left = self
            .access
            .record(session.user.id)
            .await?
            .map(|record| record.quota.left())
            .unwrap_or(0);

        if left == 0 {
            let text = self.text(session, TextId::NoInvitationsLeft);
            self.say(session, &text, Some(cb.message), None).await?;
            let alert = self.text(session, TextId::NoInvitationsLeftAlert);
            return self.answer(cb, &alert, false).await;
        }

        self.transition(session, UserUpdate::enter(State::GeneratingInvitation))
            .await?;

        let left = left.to_string();
        let text = self.format(session, TextId::EnterInvitationUsages, &[left.as_str()]);
        self.say(session, &text, Some(cb.message), None).await?;
        let alert = self.text(session, TextId::GeneratingInvitation);
        self.answer(cb, &alert, false).await
    }

    /// Free text while `GeneratingInvitation`
    pub(super) async fn submit_invitation_count(
        &self,
        session: &mut Session,
        msg: &IncomingMessage,
    ) -> Result<()> {
        let count = msg
            .text
            .as_deref()
            .and_then(|text| text.trim().parse::<u32>().ok())
            .filter(|count| *count >= 1);
        let Some(count) = count else {
            let text = self.text(session, TextId::InvalidInvitationCount);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        };

        let Some(record) = self.access.record(session.user.id).await? else {
            self.reset(session).await?;
            let text = self.text(session, TextId::NoInvitations);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        };

        if count > record.quota.left() {
            let left = record.quota.left().to_string();
            let requested = count.to_string();
            let text = self.format(
                session,
                TextId::QuotaExceeded,
                &[left.as_str(), requested.as_str()],
            );
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        }

        let invitation = self
            .access
            .mint_invitation(session.user.id, count, &self.config.invitation_code_prefix)
            .await?;

        let usages = invitation.usages.left().to_string();
        let text = self.format(
            session,
            TextId::InvitationCreated,
            &[invitation.code.as_str(), usages.as_str()],
        );
        self.say(session, &text, Some(msg.message), None).await?;
        self.reset(session).await
    }

    /// `/register`
    pub async fn register(&self, session: &mut Session, msg: &IncomingMessage) -> Result<()> {
        if self.access.is_registered(session.user.id).await? {
            let text = self.text(session, TextId::AlreadyRegistered);
            self.say(session, &text, Some(msg.message), None).await?;
            return Ok(());
        }

        self.transition(session, UserUpdate::enter(State::AwaitingInvitationCode))
            .await?;

        let text = self.text(session, TextId::EnterInvitationCode);
        let keyboard = self.cancel_code_keyboard(session)?;
        self.say(session, &text, Some(msg.message), Some(keyboard))
            .await?;
        Ok(())
    }

    /// Free text while `AwaitingInvitationCode`
    pub(super) async fn submit_invitation_code(
        &self,
        session: &mut Session,
        msg: &IncomingMessage,
    ) -> Result<()> {
        let code = msg.text.as_deref().map(str::trim).unwrap_or_default();

        let redeemed = if code.is_empty() {
            false
        } else {
            match self.access.redeem_invitation(session.user.id, code).await {
                Ok(()) => true,
                Err(e) if e.is_recoverable() => false,
                Err(e) => return Err(e),
            }
        };

        if !redeemed {
            let text = self.text(session, TextId::InvalidInvitationCode);
            let keyboard = self.cancel_code_keyboard(session)?;
            self.say(session, &text, Some(msg.message), Some(keyboard))
                .await?;
            return Ok(());
        }

        self.reset(session).await?;
        let text = self.text(session, TextId::Registered);
        self.say(session, &text, Some(msg.message), None).await?;
        Ok(())
    }

    /// Cancel button of the invitation code prompt
    pub(super) async fn cancel_registration(
        &self,
        session: &mut Session,
        cb: &CallbackContext,
    ) -> Result<()> {
        self.clear_buttons(session, cb).await?;

        let alert = self.text(session, TextId::NeverMind);
        self.answer(cb, &alert, false).await?;
        let text = self.text(session, TextId::RegistrationCancelled);
        self.say(session, &text, Some(cb.message), None).await?;
        Ok(())
    }

    fn cancel_code_keyboard(&self, session: &Session) -> Result<Keyboard> {
        Ok(vec![vec![self.button(
            session.locale,
            TextId::CancelButton,
            CallbackAction::CancelInvitationCode,
        )?]])
    }
}
