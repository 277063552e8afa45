use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL: {0}")]
    Invalid(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Insecure base URL: HTTPS required (except localhost)")]
    Insecure,
}

/// Parse and check the remote store base URL.
///
/// HTTPS is required. Plain HTTP is accepted only for `localhost`,
/// `127.0.0.1` and `::1`, which is what local test servers use.
pub fn validate_base_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim())?;

    match url.scheme() {
        "https" => Ok(url),
        "http" => {
            let local = matches!(
                url.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            );
            if !local {
                tracing::error!(base_url = %url, "Rejecting non-HTTPS base URL");
                return Err(UrlError::Insecure);
            }
            tracing::warn!(base_url = %url, "Using non-HTTPS base URL (localhost only)");
            Ok(url)
        }
        other => Err(UrlError::UnsupportedScheme(other.to_string())),
    }
}
