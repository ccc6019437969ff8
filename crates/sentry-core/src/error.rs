//! Crate-wide error type.
//!
//! Each component maps its failures onto one of these variants rather than
//! introducing its own error enum, so callers composing probes, the sampler
//! loop, and the report renderer only ever need to match on one type.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("probe sample error ({probe}): {message}")]
    ProbeSample { probe: String, message: String },

    #[error("render error: {0}")]
    Render(String),

    #[error("external tool error: {0}")]
    ExternalTool(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn probe_sample(probe: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ProbeSample {
            probe: probe.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_probe_name() {
        let err = Error::probe_sample("port_probe", "connect refused");
        assert_eq!(
            err.to_string(),
            "probe sample error (port_probe): connect refused"
        );
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
