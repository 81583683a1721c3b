use crate::{
    db::DbPool,
    entities::environmental_issue::{self, IssueSeverity, IssueStatus},
    errors::ServiceError,
    filters::ReportFilter,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Service for the environmental issue queue: filtering, pagination,
/// status transitions, and the counts the dashboard leans on.
#[derive(Clone)]
pub struct EnvironmentService {
    db_pool: Arc<DbPool>,
}

/// Issue counts grouped by status and severity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueSummary {
    pub total: u64,
    pub by_status: HashMap<IssueStatus, u64>,
    pub by_severity: HashMap<IssueSeverity, u64>,
    pub open_critical: u64,
}

fn parse_status(raw: &str) -> Result<IssueStatus, ServiceError> {
    IssueStatus::from_str(raw.replace('_', " ").trim())
        .map_err(|_| ServiceError::invalid_field("status", "is not a recognized issue status"))
}

fn parse_severity(raw: &str) -> Result<IssueSeverity, ServiceError> {
    IssueSeverity::from_str(raw.trim())
        .map_err(|_| ServiceError::invalid_field("severity", "is not a recognized severity"))
}

impl EnvironmentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    fn filter_condition(filter: &ReportFilter) -> Result<Condition, ServiceError> {
        let mut condition = Condition::all();
        if let Some(field_id) = filter.field_id {
            condition = condition.add(environmental_issue::Column::FieldId.eq(field_id));
        }
        if let Some(status) = filter.status.as_deref() {
            condition = condition.add(environmental_issue::Column::Status.eq(parse_status(status)?));
        }
        if let Some(severity) = filter.severity.as_deref() {
            condition =
                condition.add(environmental_issue::Column::Severity.eq(parse_severity(severity)?));
        }
        if let Some(search) = filter.search.as_deref() {
            let pattern = format!("%{}%", search);
            condition = condition.add(
                Condition::any()
                    .add(environmental_issue::Column::IssueType.like(pattern.clone()))
                    .add(environmental_issue::Column::Description.like(pattern)),
            );
        }
        Ok(condition)
    }

    /// Lists issues matching the filter, newest first, with the total
    /// match count for pagination.
    #[instrument(skip(self))]
    pub async fn list_issues(
        &self,
        filter: &ReportFilter,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<environmental_issue::Model>, u64), ServiceError> {
        let db = &*self.db_pool;
        let condition = Self::filter_condition(filter)?;

        let total = environmental_issue::Entity::find()
            .filter(condition.clone())
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let issues = environmental_issue::Entity::find()
            .filter(condition)
            .order_by_desc(environmental_issue::Column::ReportedAt)
            .limit(limit)
            .offset(offset)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok((issues, total))
    }

    /// Gets one issue by ID
    #[instrument(skip(self))]
    pub async fn get_issue(
        &self,
        issue_id: Uuid,
    ) -> Result<Option<environmental_issue::Model>, ServiceError> {
        let db = &*self.db_pool;
        environmental_issue::Entity::find_by_id(issue_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Moves an issue to a new status. Resolving or closing stamps
    /// `resolved_at`; reopening clears it.
    #[instrument(skip(self))]
    pub async fn transition_status(
        &self,
        issue_id: Uuid,
        status: &str,
        resolution_notes: Option<String>,
    ) -> Result<(), ServiceError> {
        let status = parse_status(status)?;

        let db = &*self.db_pool;
        let existing = environmental_issue::Entity::find_by_id(issue_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Issue {} not found", issue_id)))?;

        let mut model: environmental_issue::ActiveModel = existing.into();
        model.status = Set(status);
        model.resolved_at = Set(match status {
            IssueStatus::Resolved | IssueStatus::Closed => Some(Utc::now()),
            IssueStatus::Open | IssueStatus::InProgress => None,
        });
        if let Some(notes) = resolution_notes {
            model.resolution_notes = Set(Some(notes));
        }
        model.update(db).await.map_err(ServiceError::DatabaseError)?;

        info!(issue_id = %issue_id, %status, "Issue status changed");
        Ok(())
    }

    /// Counts issues by status and severity across the whole queue
    #[instrument(skip(self))]
    pub async fn summary(&self) -> Result<IssueSummary, ServiceError> {
        let db = &*self.db_pool;
        let issues = environmental_issue::Entity::find()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut summary = IssueSummary {
            total: issues.len() as u64,
            ..Default::default()
        };
        for issue in &issues {
            *summary.by_status.entry(issue.status).or_default() += 1;
            *summary.by_severity.entry(issue.severity).or_default() += 1;
            if issue.severity == IssueSeverity::Critical
                && matches!(issue.status, IssueStatus::Open | IssueStatus::InProgress)
            {
                summary.open_critical += 1;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_accepts_snake_and_title_case() {
        assert_eq!(parse_status("in_progress").unwrap(), IssueStatus::InProgress);
        assert_eq!(parse_status("In Progress").unwrap(), IssueStatus::InProgress);
        assert_eq!(parse_status("open").unwrap(), IssueStatus::Open);
        assert!(parse_status("escalated").is_err());
    }

    #[test]
    fn severity_parsing_is_case_insensitive() {
        assert_eq!(parse_severity("critical").unwrap(), IssueSeverity::Critical);
        assert_eq!(parse_severity("LOW").unwrap(), IssueSeverity::Low);
        assert!(parse_severity("urgent").is_err());
    }
}
