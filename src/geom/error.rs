/// Failure modes of the geometry and simulation builders.
///
/// Every variant is a validation failure: once inputs are accepted the
/// computations themselves cannot fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeomError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("degenerate input: {0}")]
    DegenerateInput(&'static str),
}

impl GeomError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        let err = Self::InvalidParameter {
            name,
            reason: reason.into(),
        };
        log::debug!("rejecting input: {err}");
        err
    }
}
