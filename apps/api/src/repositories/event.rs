//! Event repository for centralized database operations
//!
//! Attendance lives in the `attendee_ids UUID[]` column, so relationship
//! lookups are array operators (`= ANY`, `&&`) rather than joins.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::utils::{escape_ilike, order_by, EVENT_COLUMNS};
use crate::models::{Event, EventChanges, EventFilter, EventSort, NewEvent};

/// Repository for event database operations
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new EventRepository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find every event whose id is in `ids`
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Event>, sqlx::Error> {
        let sql = format!("SELECT {} FROM events WHERE id = ANY($1)", EVENT_COLUMNS);
        sqlx::query_as::<_, Event>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Find events created by any of `creator_ids`
    pub async fn find_by_creators(&self, creator_ids: &[Uuid]) -> Result<Vec<Event>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM events WHERE creator_id = ANY($1) ORDER BY {}",
            EVENT_COLUMNS,
            order_by(EventSort::DateAsc)
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(creator_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Find events attended by at least one of `user_ids`
    pub async fn find_by_attendees(&self, user_ids: &[Uuid]) -> Result<Vec<Event>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM events WHERE attendee_ids && $1 ORDER BY {}",
            EVENT_COLUMNS,
            order_by(EventSort::DateAsc)
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await
    }

    /// Fetch one window of the filtered, sorted listing
    pub async fn list(
        &self,
        filter: &EventFilter,
        sort: EventSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM events", EVENT_COLUMNS));
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY ")
            .push(order_by(sort))
            .push(" LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

        builder.build_query_as::<Event>().fetch_all(&self.pool).await
    }

    /// Count events matching `filter`
    pub async fn count(&self, filter: &EventFilter) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    /// Insert a new event owned by `creator_id`
    pub async fn create(&self, creator_id: Uuid, event: &NewEvent) -> Result<Event, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO events (title, description, date, time, location, image_url, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.time)
            .bind(&event.location)
            .bind(&event.image_url)
            .bind(creator_id)
            .fetch_one(&self.pool)
            .await
    }

    /// Apply a partial update; unset fields keep their current value
    pub async fn update(
        &self,
        id: Uuid,
        changes: &EventChanges,
    ) -> Result<Option<Event>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                date = COALESCE($4, date),
                time = COALESCE($5, time),
                location = COALESCE($6, location),
                image_url = COALESCE($7, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(id)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(changes.date)
            .bind(&changes.time)
            .bind(&changes.location)
            .bind(&changes.image_url)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete an event, returning whether a row was removed
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Append `user_id` to the attendee set unless already present
    pub async fn add_attendee(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE events SET
                attendee_ids = CASE
                    WHEN $2 = ANY(attendee_ids) THEN attendee_ids
                    ELSE array_append(attendee_ids, $2)
                END,
                updated_at = CASE WHEN $2 = ANY(attendee_ids) THEN updated_at ELSE NOW() END
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Remove `user_id` from the attendee set if present
    pub async fn remove_attendee(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Event>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE events SET
                attendee_ids = array_remove(attendee_ids, $2),
                updated_at = CASE WHEN $2 = ANY(attendee_ids) THEN NOW() ELSE updated_at END
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );
        sqlx::query_as::<_, Event>(&sql)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }
}

/// Append the WHERE clause for `filter`
///
/// Shared by `list` and `count` so both see exactly the same predicate.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter) {
    builder.push(" WHERE TRUE");

    if let Some(date) = filter.date {
        builder.push(" AND date = ").push_bind(date);
    }

    if let Some(creator_id) = filter.creator_id {
        builder.push(" AND creator_id = ").push_bind(creator_id);
    }

    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_ilike(term));
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR location ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_filter_has_no_predicates() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut builder, &EventFilter::default());
        assert_eq!(builder.sql(), "SELECT COUNT(*) FROM events WHERE TRUE");
    }

    #[test]
    fn test_full_filter_binds_every_criterion() {
        let filter = EventFilter {
            date: NaiveDate::from_ymd_opt(2025, 6, 1),
            creator_id: Some(Uuid::new_v4()),
            search: Some(" jazz ".to_string()),
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut builder, &filter);

        let sql = builder.sql();
        assert!(sql.contains("date = $1"));
        assert!(sql.contains("creator_id = $2"));
        assert!(sql.contains("title ILIKE $3"));
        assert!(sql.contains("location ILIKE $5"));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filter = EventFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM events");
        push_filter(&mut builder, &filter);
        assert!(!builder.sql().contains("ILIKE"));
    }
}
