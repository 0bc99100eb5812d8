use thiserror::Error;

#[derive(Error, Debug)]
pub enum MobilityError {
    /// A metric was asked for over a selection that cannot support it:
    /// empty subset, missing hour, or a zero denominator.
    #[error("No data for metric '{metric}'")]
    NoData { metric: &'static str },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MobilityError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

pub type MobilityResult<T> = Result<T, MobilityError>;
