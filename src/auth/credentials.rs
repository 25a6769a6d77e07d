use axum::http::{header::AUTHORIZATION, HeaderMap};
use thiserror::Error;

pub const BEARER: &str = "bearer";
pub const API_KEY: &str = "apikey";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("authorization header not found")]
    HeaderMissing,
    #[error("invalid authorization header format")]
    HeaderMalformed,
}

/// Splits `<scheme> <credential>` and checks the scheme case-insensitively.
/// The credential is returned as-is.
pub fn extract_credential<'a>(
    header: Option<&'a str>,
    scheme: &str,
) -> Result<&'a str, CredentialError> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(CredentialError::HeaderMissing),
    };
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(found), Some(credential), None) if found.eq_ignore_ascii_case(scheme) => {
            Ok(credential)
        }
        _ => Err(CredentialError::HeaderMalformed),
    }
}

/// Raw `Authorization` value. A header that is not valid UTF-8 is
/// malformed rather than missing.
pub fn authorization(headers: &HeaderMap) -> Result<Option<&str>, CredentialError> {
    headers
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| CredentialError::HeaderMalformed))
        .transpose()
}

pub fn bearer_token(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_credential(authorization(headers)?, BEARER)
}

pub fn api_key(headers: &HeaderMap) -> Result<&str, CredentialError> {
    extract_credential(authorization(headers)?, API_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(v) = value {
            map.insert(AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    fn run_scenarios(extract: fn(&HeaderMap) -> Result<&str, CredentialError>, scheme: &str) {
        let ok = headers(Some(&format!("{scheme} myToken")));
        assert_eq!(extract(&ok), Ok("myToken"));

        assert_eq!(extract(&headers(None)), Err(CredentialError::HeaderMissing));
        assert_eq!(extract(&headers(Some(""))), Err(CredentialError::HeaderMissing));
        assert_eq!(
            extract(&headers(Some("myToken"))),
            Err(CredentialError::HeaderMalformed)
        );
        assert_eq!(
            extract(&headers(Some(&format!("{scheme}myToken")))),
            Err(CredentialError::HeaderMalformed)
        );
        assert_eq!(
            extract(&headers(Some(&format!("{scheme} my Token")))),
            Err(CredentialError::HeaderMalformed)
        );
    }

    #[test]
    fn bearer_scenarios() {
        run_scenarios(bearer_token, "Bearer");
    }

    #[test]
    fn api_key_scenarios() {
        run_scenarios(api_key, "ApiKey");
    }

    #[test]
    fn scheme_match_ignores_case() {
        assert_eq!(extract_credential(Some("BEARER abc123"), BEARER), Ok("abc123"));
        assert_eq!(extract_credential(Some("Bearer abc123"), BEARER), Ok("abc123"));
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        assert_eq!(
            extract_credential(Some("ApiKey abc123"), BEARER),
            Err(CredentialError::HeaderMalformed)
        );
    }

    #[test]
    fn missing_separator_is_malformed() {
        assert_eq!(
            extract_credential(Some("Beareabc123"), BEARER),
            Err(CredentialError::HeaderMalformed)
        );
    }

    #[test]
    fn non_utf8_header_is_malformed() {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        assert_eq!(authorization(&map), Err(CredentialError::HeaderMalformed));
        assert_eq!(bearer_token(&map), Err(CredentialError::HeaderMalformed));
        assert_eq!(api_key(&map), Err(CredentialError::HeaderMalformed));
        assert_eq!(authorization(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn credential_is_not_trimmed_or_decoded() {
        assert_eq!(extract_credential(Some("Bearer a%20b"), BEARER), Ok("a%20b"));
    }
}
