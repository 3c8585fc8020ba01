use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_]{3,30}$").unwrap();
    static ref CITY_RE: Regex = Regex::new(r"^[A-Za-z][A-Za-z .'-]{1,59}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 chars with one letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn is_valid_username(name: &str) -> bool {
    USERNAME_RE.is_match(name)
}

pub fn is_valid_city(city: &str) -> bool {
    CITY_RE.is_match(city)
}

/// Maps an accepted avatar content type to its file extension.
/// Anything not listed here is rejected at upload time.
pub fn avatar_ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_normal_addresses() {
        assert!(is_valid_email("bob@x.com"));
        assert!(is_valid_email("first.last@sub.domain.co.uk"));
    }

    #[test]
    fn email_rejects_garbage() {
        assert!(!is_valid_email("bob"));
        assert!(!is_valid_email("bob@"));
        assert!(!is_valid_email("bob@x"));
        assert!(!is_valid_email("bob @x.com"));
    }

    #[test]
    fn password_needs_length_letter_and_digit() {
        assert!(is_valid_password("Abc12345"));
        assert!(!is_valid_password("short1"));
        assert!(!is_valid_password("allletters"));
        assert!(!is_valid_password("12345678"));
    }

    #[test]
    fn username_shape() {
        assert!(is_valid_username("bob"));
        assert!(is_valid_username("bob_the_2nd"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("email@style"));
    }

    #[test]
    fn city_shape() {
        assert!(is_valid_city("London"));
        assert!(is_valid_city("Stoke-on-Trent"));
        assert!(is_valid_city("St. Albans"));
        assert!(!is_valid_city(""));
        assert!(!is_valid_city("X"));
        assert!(!is_valid_city("123ville"));
    }

    #[test]
    fn avatar_mime_allowlist() {
        assert_eq!(avatar_ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(avatar_ext_from_mime("image/png"), Some("png"));
        assert_eq!(avatar_ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(avatar_ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(avatar_ext_from_mime("application/pdf"), None);
        assert_eq!(avatar_ext_from_mime("text/html"), None);
    }
}
