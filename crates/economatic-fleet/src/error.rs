//! Provider error types.

use thiserror::Error;

/// Result type alias for provider calls.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors reported by the fleet-management provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Another scaling activity is running on the group.
    #[error("scaling activity in progress for {group}: {message}")]
    ScalingActivityInProgress { group: String, message: String },

    /// The provider is busy with concurrent updates.
    #[error("resource contention: {0}")]
    ResourceContention(String),

    #[error("invalid pagination token: {0}")]
    InvalidNextToken(String),

    #[error("group not found: {0}")]
    GroupNotFound(String),

    #[error("provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// True for conditions expected to clear on their own by the next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::ScalingActivityInProgress { .. } | ProviderError::ResourceContention(_)
        )
    }

    /// Stable short code for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            ProviderError::ScalingActivityInProgress { .. } => "scaling_activity_in_progress",
            ProviderError::ResourceContention(_) => "resource_contention",
            ProviderError::InvalidNextToken(_) => "invalid_next_token",
            ProviderError::GroupNotFound(_) => "group_not_found",
            ProviderError::Other(_) => "other",
        }
    }
}
