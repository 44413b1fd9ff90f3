use super::link::LinkCodec;
use crate::store::{User, UserStore};
use whisper_common::config::protocol::USERNAME_MARKER;
use whisper_common::Result;

/// Resolve a `/start` argument to the user it names.
///
/// An argument starting with the username marker is looked up as a
/// username (case-insensitively); anything else must be a link token. A
/// malformed token is an error, a well-formed token without an owner is
/// `Ok(None)`.
pub async fn resolve_identity<S: UserStore>(
    store: &S,
    codec: &LinkCodec,
    arg: &str,
) -> Result<Option<User>> {
    if let Some(username) = arg.strip_prefix(USERNAME_MARKER) {
        let username = username.to_ascii_lowercase();
        return Ok(store.get_user_by_username(&username).await?);
    }

    let (link_key, created_at) = codec.decode(arg)?;
    Ok(store.get_user_by_link(link_key, created_at).await?)
}
