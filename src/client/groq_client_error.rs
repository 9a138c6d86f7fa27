use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum GroqClientError {
    #[error("Upstream provider did not answer in time")]
    Timeout,

    #[error("Http request failed: {0}")]
    Http(reqwest::Error),

    #[error("Upstream error: {1}")]
    Upstream(StatusCode, String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for GroqClientError {
    fn from(e: reqwest::Error) -> Self {
        match e.is_timeout() {
            true => GroqClientError::Timeout,
            false => GroqClientError::Http(e),
        }
    }
}
