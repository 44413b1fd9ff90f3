/// Localized text lookup
///
/// Every user-visible string goes through a [`Catalog`]. The locale is an
/// explicit argument of each lookup; there is no process-wide current locale.

mod en;
mod fa;

use whisper_common::Locale;

/// Identifiers of every localized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextId {
    Start,
    Info,
    InitialSendPrompt,
    UnblockButton,
    SendMessageButton,
    ReplyButton,
    BlockButton,
    UnblockAllResult,
    UserBlocked,
    UserUnblocked,
    CancelButton,
    YourLanguage,
    NoPreferredLanguage,
    NeverMind,
    LanguageUpdated,
    LanguageUpdatedAlert,
    YouHaveBlockedThisUser,
    ThisUserHasBlockedYou,
    NewMessage,
    NewReply,
    MessageSent,
    OpenMessageButton,
    MessageOpened,
    ReplyingToMessage,
    ReplyToThisMessage,
    UserNotFound,
    MessageToYourself,
    Link,
    Or,
    InvalidCommand,
    Error,
    YourCurrentUsername,
    ChangeUsernameButton,
    RemoveUsernameButton,
    NoUsername,
    SetUsernameButton,
    UsernameExplanation,
    EnterNewUsername,
    SettingUsername,
    UsernameRemoved,
    InvalidUsername,
    UsernameSet,
    UsernameExists,
    SameUsername,
    NotRegistered,
    NoInvitations,
    InvitationSummary,
    NoGeneratedCodes,
    GeneratedCodes,
    GenerateCodeButton,
    NoInvitationsLeft,
    NoInvitationsLeftAlert,
    EnterInvitationUsages,
    GeneratingInvitation,
    InvalidInvitationCount,
    QuotaExceeded,
    InvitationCreated,
    EnterInvitationCode,
    AlreadyRegistered,
    InvalidInvitationCode,
    Registered,
    RegistrationCancelled,
}

impl TextId {
    pub const ALL: [TextId; 62] = [
        TextId::Start,
        TextId::Info,
        TextId::InitialSendPrompt,
        TextId::UnblockButton,
        TextId::SendMessageButton,
        TextId::ReplyButton,
        TextId::BlockButton,
        TextId::UnblockAllResult,
        TextId::UserBlocked,
        TextId::UserUnblocked,
        TextId::CancelButton,
        TextId::YourLanguage,
        TextId::NoPreferredLanguage,
        TextId::NeverMind,
        TextId::LanguageUpdated,
        TextId::LanguageUpdatedAlert,
        TextId::YouHaveBlockedThisUser,
        TextId::ThisUserHasBlockedYou,
        TextId::NewMessage,
        TextId::NewReply,
        TextId::MessageSent,
        TextId::OpenMessageButton,
        TextId::MessageOpened,
        TextId::ReplyingToMessage,
        TextId::ReplyToThisMessage,
        TextId::UserNotFound,
        TextId::MessageToYourself,
        TextId::Link,
        TextId::Or,
        TextId::InvalidCommand,
        TextId::Error,
        TextId::YourCurrentUsername,
        TextId::ChangeUsernameButton,
        TextId::RemoveUsernameButton,
        TextId::NoUsername,
        TextId::SetUsernameButton,
        TextId::UsernameExplanation,
        TextId::EnterNewUsername,
        TextId::SettingUsername,
        TextId::UsernameRemoved,
        TextId::InvalidUsername,
        TextId::UsernameSet,
        TextId::UsernameExists,
        TextId::SameUsername,
        TextId::NotRegistered,
        TextId::NoInvitations,
        TextId::InvitationSummary,
        TextId::NoGeneratedCodes,
        TextId::GeneratedCodes,
        TextId::GenerateCodeButton,
        TextId::NoInvitationsLeft,
        TextId::NoInvitationsLeftAlert,
        TextId::EnterInvitationUsages,
        TextId::GeneratingInvitation,
        TextId::InvalidInvitationCount,
        TextId::QuotaExceeded,
        TextId::InvitationCreated,
        TextId::EnterInvitationCode,
        TextId::AlreadyRegistered,
        TextId::InvalidInvitationCode,
        TextId::Registered,
        TextId::RegistrationCancelled,
    ];
}

/// Source of localized texts. Placeholders are written `{}` and filled in
/// order by [`Catalog::format`].
pub trait Catalog: Send + Sync {
    fn text(&self, locale: Locale, id: TextId) -> String;

    fn format(&self, locale: Locale, id: TextId, args: &[&str]) -> String {
        fill_placeholders(&self.text(locale, id), args)
    }
}

/// Texts compiled into the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl Catalog for BuiltinCatalog {
    fn text(&self, locale: Locale, id: TextId) -> String {
        match locale {
            Locale::EnUs => en::text(id),
            Locale::FaIr => fa::text(id),
        }
        .to_string()
    }
}

fn fill_placeholders(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;

    while let Some(pos) = rest.find("{}") {
        out.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_placeholders() {
        assert_eq!(fill_placeholders("Error: {}", &["boom"]), "Error: boom");
        assert_eq!(fill_placeholders("{} of {}", &["1", "2"]), "1 of 2");
        assert_eq!(fill_placeholders("{} and {}", &["only"]), "only and {}");
        assert_eq!(fill_placeholders("plain", &["unused"]), "plain");
    }

    #[test]
    fn test_locales_agree_on_placeholders() {
        for id in TextId::ALL {
            let en = en::text(id);
            let fa = fa::text(id);
            assert!(!en.is_empty(), "{:?} is empty in en_US", id);
            assert!(!fa.is_empty(), "{:?} is empty in fa_IR", id);
            assert_eq!(
                en.matches("{}").count(),
                fa.matches("{}").count(),
                "placeholder mismatch for {:?}",
                id
            );
        }
    }

    #[test]
    fn test_catalog_format() {
        let catalog = BuiltinCatalog;
        let text = catalog.format(Locale::EnUs, TextId::UsernameSet, &["ab_1"]);
        assert_eq!(text, "Username has been set: ab_1");
    }
}
