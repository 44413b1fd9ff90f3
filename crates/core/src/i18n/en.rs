use super::TextId;

pub(super) fn text(id: TextId) -> &'static str {
    match id {
        TextId::Start => "Welcome! Use /link command to get your link!",
        TextId::Info => "Whisper anonymous relay\n\nShare your link and receive messages without revealing who anyone is.",
        TextId::InitialSendPrompt => "You are sending message to:\n{}\n\nEnter your message:",
        TextId::UnblockButton => "Unblock",
        TextId::SendMessageButton => "Send message",
        TextId::ReplyButton => "Reply",
        TextId::BlockButton => "Block",
        TextId::UnblockAllResult => "All users unblocked!",
        TextId::UserBlocked => "User blocked!",
        TextId::UserUnblocked => "User unblocked!",
        TextId::CancelButton => "Cancel",
        TextId::YourLanguage => "Your language is: {}",
        TextId::NoPreferredLanguage => "You don't have a preferred language yet.",
        TextId::NeverMind => "Never mind!",
        TextId::LanguageUpdated => "Language updated successfully to English.",
        TextId::LanguageUpdatedAlert => "Language updated!",
        TextId::YouHaveBlockedThisUser => "You have blocked this user.",
        TextId::ThisUserHasBlockedYou => "This user has blocked you.",
        TextId::NewMessage => "You have a new message.",
        TextId::NewReply => "New reply to your message.",
        TextId::MessageSent => "Message sent!",
        TextId::OpenMessageButton => "Open Message",
        TextId::MessageOpened => "Message opened!",
        TextId::ReplyingToMessage => "Replying to message...",
        TextId::ReplyToThisMessage => "Reply to this message:",
        TextId::UserNotFound => "User not found! Wrong link?",
        TextId::MessageToYourself => "Do you really want to talk to yourself? So sad! Share your link with friends or post it on social media to get anonymous messages!",
        TextId::Link => "Others can use this link to send you anonymous messages:",
        TextId::Or => "or:",
        TextId::InvalidCommand => "Invalid command!",
        TextId::Error => "Error: {}",
        TextId::YourCurrentUsername => "Your current username is: {}",
        TextId::ChangeUsernameButton => "Change",
        TextId::RemoveUsernameButton => "Remove",
        TextId::NoUsername => "You don't have a username!",
        TextId::SetUsernameButton => "Set one",
        TextId::UsernameExplanation => "Create a username that starts with a letter, includes 3-20 characters, and may contain letters, numbers, or underscores (_). Usernames are automatically converted to lowercase.",
        TextId::EnterNewUsername => "Enter new username:",
        TextId::SettingUsername => "Setting username...",
        TextId::UsernameRemoved => "Username has been removed!",
        TextId::InvalidUsername => "The entered username is not valid. Enter another one:",
        TextId::UsernameSet => "Username has been set: {}",
        TextId::UsernameExists => "The entered username exists. Enter another one:",
        TextId::SameUsername => "You already own this username silly! If you want to change it, run the username command once more!",
        TextId::NotRegistered => "The bot is not public yet! :(\nIf you have an invitation code, run /register command to activate your account.",
        TextId::NoInvitations => "You don't have any invitations!",
        TextId::InvitationSummary => "Total invitations available: {}\nTotal invitations used: {}",
        TextId::NoGeneratedCodes => "You have no generated invitation codes.",
        TextId::GeneratedCodes => "You have {} generated invitation codes:",
        TextId::GenerateCodeButton => "Generate Code",
        TextId::NoInvitationsLeft => "You do not have any invitation codes left!",
        TextId::NoInvitationsLeftAlert => "No invitations left!",
        TextId::EnterInvitationUsages => "Please enter the number of available usages for this code.\nNote that this number should not exceed your total available invitations which is currently {}.",
        TextId::GeneratingInvitation => "Generating invitation code...",
        TextId::InvalidInvitationCount => "Input is not a valid integer. Enter again.",
        TextId::QuotaExceeded => "Currently you only have {} invitations left and cannot generate a code with {} usages.",
        TextId::InvitationCreated => "Invitation created!\n\nCode: {}\nUsages left: {}",
        TextId::EnterInvitationCode => "If you have an invitation code please enter it below.",
        TextId::AlreadyRegistered => "You are already registered silly!",
        TextId::InvalidInvitationCode => "The code you entered is not valid or used before. Please check the code and enter again.",
        TextId::Registered => "You registered successfully! Now you can use /link command to get your own link and start using the bot! :)",
        TextId::RegistrationCancelled => "Okay! You can always use the command /register to enter invitation codes when you get a valid one!",
    }
}
