/// Platform commands understood by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` with an optional link token or `_username`
    Start(Option<String>),
    Info,
    Link,
    Username,
    Language,
    Invite,
    Register,
    UnblockAll,
}

impl Command {
    /// Parse message text as a command.
    ///
    /// Names are case-sensitive and may carry an `@bot` suffix. Unknown
    /// commands yield `None` and are treated as free text.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let head = words.next()?.strip_prefix('/')?;
        let name = head.split('@').next().unwrap_or(head);

        let command = match name {
            "start" => Command::Start(words.next().map(str::to_string)),
            "info" => Command::Info,
            "link" => Command::Link,
            "username" => Command::Username,
            "language" => Command::Language,
            "invite" => Command::Invite,
            "register" => Command::Register,
            "unblockall" => Command::UnblockAll,
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start(_) => "start",
            Command::Info => "info",
            Command::Link => "link",
            Command::Username => "username",
            Command::Language => "language",
            Command::Invite => "invite",
            Command::Register => "register",
            Command::UnblockAll => "unblockall",
        }
    }
}
