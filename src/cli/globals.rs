use secrecy::SecretString;

/// Process-wide arguments that are not tied to a single action.
///
/// The session secret keys the HMAC over every session cookie; it never
/// appears in logs (`SecretString` redacts its `Debug` output).
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub session_secret: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            session_secret: secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(SecretString::from("super-secret"));
        assert_eq!(args.session_secret.expose_secret(), "super-secret");
        assert!(!format!("{args:?}").contains("super-secret"));
    }
}
