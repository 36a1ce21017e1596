use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ForgeError, Result};

const TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("cadence/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub(crate) fn client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .build()
        .map_err(ForgeError::Client)
}

pub(crate) fn parse_base(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|source| ForgeError::InvalidBaseUrl {
        url: url.to_string(),
        source: Some(source),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(ForgeError::InvalidBaseUrl {
            url: url.to_string(),
            source: None,
        });
    }
    Ok(parsed)
}

/// Appends percent-encoded path segments to `base`.
pub(crate) fn join_segments<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ForgeError::InvalidBaseUrl {
            url: base.to_string(),
            source: None,
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Sends the request and returns the status code and body text.
pub(crate) fn execute(request: RequestBuilder, target: &str) -> Result<(u16, String)> {
    let response = request.send().map_err(|source| ForgeError::Http {
        target: target.to_string(),
        source,
    })?;
    let status = response.status().as_u16();
    let body = response.text().map_err(|source| ForgeError::Http {
        target: target.to_string(),
        source,
    })?;
    Ok((status, body))
}

pub(crate) fn ensure_success(target: &str, status: u16, body: &str) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(ForgeError::Status {
        target: target.to_string(),
        status,
        message: error_message(body),
    })
}

pub(crate) fn decode<T: DeserializeOwned>(target: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| ForgeError::Decode {
        target: target.to_string(),
        source,
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_encoded_and_appended() {
        let base = parse_base("https://api.github.com").expect("valid");

        let url = join_segments(&base, ["repos", "acme", "widgets", "pulls"]).expect("joinable");

        assert_eq!(url.as_str(), "https://api.github.com/repos/acme/widgets/pulls");
    }

    #[test]
    fn base_with_path_keeps_prefix() {
        let base = parse_base("https://ghe.example.com/api/v3/").expect("valid");

        let url = join_segments(&base, ["repos", "acme", "widgets"]).expect("joinable");

        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/acme/widgets");
    }

    #[test]
    fn scoped_name_is_one_segment() {
        let base = parse_base("https://registry.npmjs.org").expect("valid");

        let url = join_segments(&base, ["@acme/widgets"]).expect("joinable");

        assert_eq!(url.as_str(), "https://registry.npmjs.org/@acme%2Fwidgets");
    }

    #[test]
    fn non_base_url_is_rejected() {
        assert!(matches!(
            parse_base("mailto:someone@example.com"),
            Err(ForgeError::InvalidBaseUrl { .. })
        ));
        assert!(parse_base("not a url").is_err());
    }

    #[test]
    fn failure_status_carries_forge_message() {
        let err = ensure_success("GET x", 422, r#"{"message": "Validation Failed"}"#)
            .expect_err("422 is a failure");

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.target(), Some("GET x"));
        assert_eq!(err.to_string(), "GET x responded with status 422: Validation Failed");
    }

    #[test]
    fn failure_status_without_json_body() {
        let err = ensure_success("GET x", 502, "<html>bad gateway</html>").expect_err("failure");

        assert!(err.to_string().ends_with("Unknown error"));
    }

    #[test]
    fn success_status_passes() {
        assert!(ensure_success("GET x", 201, "{}").is_ok());
    }
}
