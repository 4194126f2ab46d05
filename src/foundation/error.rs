/// Crate-wide result alias.
pub type CinescrollResult<T> = Result<T, CinescrollError>;

/// Every failure cinescroll reports.
#[derive(thiserror::Error, Debug)]
pub enum CinescrollError {
    /// Caller-supplied input (viewport, config values) out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// Stage config with an empty class name or a zero breakpoint.
    #[error("config error: {0}")]
    Config(String),

    /// Page description that cannot be turned into panels.
    #[error("markup error: {0}")]
    Markup(String),

    /// Timeline assembly failed, e.g. a duplicate label.
    #[error("timeline error: {0}")]
    Timeline(String),

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// File I/O, carrying `anyhow` context.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CinescrollError {
    /// Build a [`CinescrollError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CinescrollError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CinescrollError::Markup`].
    pub fn markup(msg: impl Into<String>) -> Self {
        Self::Markup(msg.into())
    }

    /// Build a [`CinescrollError::Timeline`].
    pub fn timeline(msg: impl Into<String>) -> Self {
        Self::Timeline(msg.into())
    }

    /// Build a [`CinescrollError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CinescrollError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CinescrollError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            CinescrollError::config("x")
                .to_string()
                .contains("config error:")
        );
        assert!(
            CinescrollError::markup("x")
                .to_string()
                .contains("markup error:")
        );
        assert!(
            CinescrollError::timeline("x")
                .to_string()
                .contains("timeline error:")
        );
        assert!(
            CinescrollError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CinescrollError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn json_errors_map_to_serde() {
        let err: CinescrollError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CinescrollError::Serde(_)));
    }
}
