// ABOUTME: Structured error types for database operations
// ABOUTME: Provides context-carrying errors and sqlx::Error conversion behind a feature flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Entity lookup by id returned nothing
    #[error("{entity_type} not found: {entity_id}")]
    NotFound {
        /// Kind of entity looked up
        entity_type: &'static str,
        /// Identifier that was looked up
        entity_id: String,
    },

    /// Query failed to execute
    #[error("Query failed: {context}")]
    QueryError {
        /// What the query was doing
        context: String,
    },

    /// Connection or pool failure
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    /// Stored row could not be mapped into a domain value
    #[error("Invalid stored data in {field}: {reason}")]
    InvalidData {
        /// Column that failed to map
        field: &'static str,
        /// Why it failed
        reason: String,
    },
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::ConnectionError(error.to_string())
            }
            other => Self::QueryError {
                context: other.to_string(),
            },
        }
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for super::AppError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(error).into()
    }
}
