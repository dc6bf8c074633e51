//! Error types for the system-upgrade-controller gate
//!
//! Only two failure classes ever abort a reconciliation pass: a Kubernetes API
//! failure (transport) and an unparseable Kubernetes version. Everything the
//! deployment system reports mid-rollout is a state, not an error, and never
//! reaches this type.

use thiserror::Error;

/// Main error type for gate operations
#[derive(Debug, Error)]
pub enum Error {
    /// Kubernetes API error (lookup or write failed)
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },

    /// A Kubernetes version string could not be parsed
    #[error("invalid version {version:?}: {message}")]
    InvalidVersion {
        /// The offending input
        version: String,
        /// Why it was rejected
        message: String,
    },

    /// Validation error for an object we were asked to reconcile
    #[error("validation error for {object}: {message}")]
    Validation {
        /// Name of the object with invalid configuration
        object: String,
        /// Description of what's invalid
        message: String,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g., "reconciler", "controller")
        context: String,
    },
}

impl Error {
    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
            message: msg.into(),
        }
    }

    /// Create a validation error for a named object
    pub fn validation_for(object: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            object: object.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error with context
    pub fn internal_with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }

    /// Check if this error is retryable
    ///
    /// Transport failures are retried on the next resync. A bad version or a
    /// bad object spec will fail the same way until someone edits the object.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Kube { source } => {
                // 4xx other than conflicts/throttling won't fix themselves
                !matches!(
                    source,
                    kube::Error::Api(ae)
                        if (400..500).contains(&ae.code) && ae.code != 409 && ae.code != 429
                )
            }
            Error::InvalidVersion { .. } => false,
            Error::Validation { .. } => false,
            Error::Internal { .. } => true,
        }
    }
}
