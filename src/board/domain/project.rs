//! Project boards that own task columns.

use super::{BoardDomainError, ProjectId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Length bounds applied to project names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectNameBounds {
    /// Minimum length in characters after trimming.
    pub min: usize,
    /// Maximum length in characters after trimming.
    pub max: usize,
}

/// A project board grouping tasks into status columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    created_by: UserId,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted name.
    pub name: String,
    /// User who created the project.
    pub created_by: UserId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project with a trimmed, length-checked name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidProjectName`] when the trimmed name
    /// falls outside `bounds`.
    pub fn new(
        name: impl Into<String>,
        created_by: UserId,
        bounds: ProjectNameBounds,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length < bounds.min || length > bounds.max {
            return Err(BoardDomainError::InvalidProjectName {
                length,
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(Self {
            id: ProjectId::new(),
            name: trimmed.to_owned(),
            created_by,
            created_at: clock.utc(),
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            created_by: data.created_by,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
