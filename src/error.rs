// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the loan arithmetic, the response normalizer and the
/// service clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Bad numeric input handed to the amortization engine or the advisor.
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    /// A reply that does not have the shape the service interface declares.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A variant tag outside the closed set declared for the field.
    #[error("unknown variant '{tag}' for {field}")]
    UnknownVariant { field: String, tag: String },

    /// Network or service failure reported by the transport.
    #[error("remote service unavailable: {0}")]
    RemoteUnavailable(String),

    /// The service answered but refused the call.
    #[error("{method} rejected by service: {message}")]
    RemoteRejected { method: String, message: String },
}

impl CoreError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        CoreError::MalformedResponse(detail.into())
    }

    pub fn rejected(method: &str, message: impl Into<String>) -> Self {
        CoreError::RemoteRejected {
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// True for the two decode failures the normalizer can raise.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            CoreError::MalformedResponse(_) | CoreError::UnknownVariant { .. }
        )
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
