/// Identity management
///
/// Durable identities, link tokens, usernames and resolution of a `/start`
/// argument to the user it addresses.

pub mod link;
pub mod resolver;
pub mod username;

pub use link::{LinkCodec, LinkError};
pub use resolver::resolve_identity;
pub use username::{validate_username, UsernameError};

use rand::Rng;
use whisper_common::{LinkKey, UserId, USER_ID_LEN};

/// Generate a fresh durable identity
pub fn generate_user_id() -> UserId {
    let mut bytes = [0u8; USER_ID_LEN];
    rand::thread_rng().fill(&mut bytes);
    UserId::from_bytes(bytes)
}

/// Draw a link key uniformly from the six-digit range
pub fn random_link_key() -> LinkKey {
    LinkKey::new(rand::thread_rng().gen_range(LinkKey::MIN..=LinkKey::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_differ() {
        let a = generate_user_id();
        let b = generate_user_id();
        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), 32);
    }

    #[test]
    fn test_link_key_range() {
        for _ in 0..1000 {
            let key = random_link_key().get();
            assert!((LinkKey::MIN..=LinkKey::MAX).contains(&key));
        }
    }
}
