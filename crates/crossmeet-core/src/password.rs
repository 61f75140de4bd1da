//! Meeting password generation.

use rand::Rng as _;

/// Length of a generated meeting password.
const PASSWORD_LENGTH: usize = 8;

/// Characters a meeting password may contain: lowercase letters and digits.
const PASSWORD_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generates an 8-character meeting password from {a-z, 0-9}.
///
/// This is a display/access password shown to invitees, not a security
/// boundary; the provider may replace it with its own on creation.
pub fn generate_password() -> String {
    let mut rng = rand::rng();
    (0..PASSWORD_LENGTH)
        .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_has_fixed_length() {
        assert_eq!(generate_password().len(), PASSWORD_LENGTH);
    }

    #[test]
    fn password_charset_membership() {
        for _ in 0..100 {
            let password = generate_password();
            assert_eq!(password.len(), 8);
            assert!(
                password
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                "unexpected character in password {password:?}"
            );
        }
    }
}
