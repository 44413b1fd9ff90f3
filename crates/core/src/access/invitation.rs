use rand::Rng;

/// Characters of generated invitation codes. Look-alikes `l`, `o` and `0`
/// are left out.
pub const INVITATION_CHARSET: &[u8] = b"abcdefghijkmnpqrstuvwxyz123456789";

const MIN_SEGMENT_LEN: usize = 3;
const MAX_SEGMENT_LEN: usize = 5;

/// Draw a code of the form `<prefix><seg>-<seg>`, each segment 3-5 chars
pub fn generate_invitation_code(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut segment = || {
        let len = rng.gen_range(MIN_SEGMENT_LEN..=MAX_SEGMENT_LEN);
        (0..len)
            .map(|_| INVITATION_CHARSET[rng.gen_range(0..INVITATION_CHARSET.len())] as char)
            .collect::<String>()
    };

    let first = segment();
    let second = segment();
    format!("{}{}-{}", prefix, first, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        for _ in 0..200 {
            let code = generate_invitation_code("whisper-");
            let body = code.strip_prefix("whisper-").unwrap();
            let (first, second) = body.split_once('-').unwrap();

            for segment in [first, second] {
                assert!((MIN_SEGMENT_LEN..=MAX_SEGMENT_LEN).contains(&segment.len()));
                assert!(segment.bytes().all(|b| INVITATION_CHARSET.contains(&b)));
            }
        }
    }

    #[test]
    fn test_custom_prefix() {
        assert!(generate_invitation_code("hush-").starts_with("hush-"));
    }
}
