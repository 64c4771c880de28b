use url::form_urlencoded;

use crate::errors::AuthError;

pub const RECOVERY_TYPE: &str = "recovery";

/// Tokens carried in the fragment of a password reset link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryFragment {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<i64>,
}

/// `<reset_url>#access_token=..&refresh_token=..&expires_in=..&type=recovery`
pub fn build_recovery_link(
    reset_url: &str,
    access_token: &str,
    refresh_token: &str,
    expires_in: i64,
) -> String {
    let fragment = form_urlencoded::Serializer::new(String::new())
        .append_pair("access_token", access_token)
        .append_pair("refresh_token", refresh_token)
        .append_pair("expires_in", &expires_in.to_string())
        .append_pair("type", RECOVERY_TYPE)
        .finish();
    format!("{reset_url}#{fragment}")
}

/// Accepts a bare fragment (with or without `#`) or the full URL.
pub fn parse_recovery_fragment(raw: &str) -> Result<RecoveryFragment, AuthError> {
    let raw = raw.trim();
    let fragment = match raw.split_once('#') {
        Some((_, fragment)) => fragment,
        None => raw,
    };

    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut kind = None;
    let mut error_description = None;

    for (key, value) in form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "type" => kind = Some(value.into_owned()),
            "error_description" => error_description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(description) = error_description {
        return Err(AuthError::InvalidRecoveryLink(description));
    }
    if kind.as_deref() != Some(RECOVERY_TYPE) {
        return Err(AuthError::InvalidRecoveryLink("not a recovery link".into()));
    }

    match (access_token, refresh_token) {
        (Some(access_token), Some(refresh_token)) if !access_token.is_empty() && !refresh_token.is_empty() => {
            Ok(RecoveryFragment { access_token, refresh_token, expires_in })
        }
        _ => Err(AuthError::InvalidRecoveryLink("missing tokens".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_link_parses_back() {
        let link = build_recovery_link("https://folio.example.com/reset-password", "a.b.c", "d.e.f", 3600);
        assert!(link.starts_with("https://folio.example.com/reset-password#access_token="));

        let parsed = parse_recovery_fragment(&link).unwrap();
        assert_eq!(parsed.access_token, "a.b.c");
        assert_eq!(parsed.refresh_token, "d.e.f");
        assert_eq!(parsed.expires_in, Some(3600));
    }

    #[test]
    fn bare_fragment_with_hash_is_accepted() {
        let parsed = parse_recovery_fragment("#type=recovery&access_token=x&refresh_token=y").unwrap();
        assert_eq!(parsed.access_token, "x");
        assert_eq!(parsed.expires_in, None);
    }

    #[test]
    fn wrong_type_or_missing_tokens_are_rejected() {
        assert!(parse_recovery_fragment("access_token=x&refresh_token=y&type=signup").is_err());
        assert!(parse_recovery_fragment("access_token=x&type=recovery").is_err());
        assert!(parse_recovery_fragment("").is_err());
    }

    #[test]
    fn provider_error_is_surfaced() {
        let err = parse_recovery_fragment("#error=access_denied&error_description=Email+link+is+invalid+or+has+expired")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid recovery link: Email link is invalid or has expired");
    }
}
