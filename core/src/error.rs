use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    /// Bad run configuration: unknown program or strategy tag, non-positive
    /// capacity, county with zero population. Raised before any tick runs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed population input: a configured county absent from the
    /// population map, or a seeker record with out-of-range fields.
    /// Raised at initialization, never mid-run.
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// A logic defect surfaced at runtime: an application resolved twice,
    /// or a team's capacity counter exceeding its budget after a pass.
    /// Never corrected silently — the offending tick aborts the run.
    #[error("State invariant violated at month {month}: {detail}")]
    StateInvariant { month: u32, detail: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
