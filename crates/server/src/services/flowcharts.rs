//! Flowchart history service.
//!
//! Each user holds a bounded FIFO of diagnostic sessions: the generation
//! workflow (an external collaborator) produces the flowchart content and
//! persists it here; clients list the history and delete entries by index.

use carit_core::UserId;

use crate::db::{Database, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{Flowchart, QuestionAnswer, VehicleDescription};

use super::MISSING_FIELDS;

/// The history cap; inserting past it evicts the oldest entry.
pub const MAX_FLOWCHARTS: usize = 5;

/// Flowchart history service.
pub struct FlowchartService<'a> {
    users: UserRepository<'a>,
}

impl<'a> FlowchartService<'a> {
    /// Create a new flowchart service.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
        }
    }

    /// Persist a generated diagnostic session, evicting the oldest entry
    /// once the history is at [`MAX_FLOWCHARTS`]. The trim-and-append is a
    /// single atomic store operation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when any argument is blank or empty, and
    /// `NotFound` for an unknown user.
    pub async fn save(
        &self,
        user_id: &UserId,
        flowchart: &str,
        vehicle: VehicleDescription,
        issues: &str,
        responses: Vec<QuestionAnswer>,
    ) -> Result<()> {
        if user_id.is_blank()
            || flowchart.trim().is_empty()
            || issues.trim().is_empty()
            || responses.is_empty()
        {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }
        let vehicle = vehicle
            .into_key()
            .ok_or_else(|| AppError::InvalidArgument(MISSING_FIELDS.to_owned()))?;

        let record = Flowchart {
            flowchart: flowchart.to_owned(),
            vehicle,
            issues: issues.to_owned(),
            responses,
        };
        self.users
            .push_flowchart(user_id, record, MAX_FLOWCHARTS)
            .await
            .map_err(user_not_found)?;

        tracing::debug!(user = %user_id, "flowchart saved");
        Ok(())
    }

    /// The user's history in insertion order, oldest first. Empty for an
    /// unknown user.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank user id.
    pub async fn list(&self, user_id: &UserId) -> Result<Vec<Flowchart>> {
        if user_id.is_blank() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }
        Ok(self
            .users
            .get(user_id)
            .await
            .map(|doc| doc.flowcharts)
            .unwrap_or_default())
    }

    /// Delete the history entry at `index`, preserving the order of the
    /// rest.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank user id, for a user with no
    /// history at all ("No flowcharts"), or for an index outside `[0, len)`.
    /// Every failure renders as a 400, matching the delete endpoint's
    /// 200/400 wire contract.
    pub async fn delete_at(&self, user_id: &UserId, index: i64) -> Result<()> {
        if user_id.is_blank() {
            return Err(AppError::InvalidArgument(MISSING_FIELDS.to_owned()));
        }

        let Some(doc) = self.users.get(user_id).await else {
            return Err(AppError::InvalidArgument("No flowcharts".to_owned()));
        };

        let len = doc.flowcharts.len();
        let valid = usize::try_from(index).ok().filter(|i| *i < len);
        let Some(index) = valid else {
            return Err(AppError::InvalidArgument("Index out of range".to_owned()));
        };

        let mut flowcharts = doc.flowcharts;
        flowcharts.remove(index);
        self.users
            .set_flowcharts(user_id, flowcharts)
            .await
            .map_err(user_not_found)?;
        Ok(())
    }
}

fn user_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("User not found".to_owned()),
    }
}
