//! Query record operations

use super::Database;
use crate::error::{CounselError, Result};
use chrono::Utc;
use rusqlite::params;
use std::collections::HashMap;

/// Answered query record from database
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub id: i64,
    pub requester_id: i64,
    pub expert_id: i64,
    pub subject: String,
    pub question: String,
    pub response: String,
    pub sources: Vec<String>,
    pub credits_spent: i64,
    pub degraded: bool,
    pub failure_reason: Option<String>,
    pub created_at: String,
}

/// Fields for inserting a new query
#[derive(Debug, Clone)]
pub struct QueryInsert<'a> {
    pub requester_id: i64,
    pub expert_id: i64,
    pub subject: &'a str,
    pub question: &'a str,
    pub response: &'a str,
    pub sources: &'a [String],
    pub credits_spent: i64,
    pub degraded: bool,
    pub failure_reason: Option<&'a str>,
}

/// Aggregated analytics over answered queries
#[derive(Debug, Clone, Default)]
pub struct QueryAnalytics {
    pub total_queries: usize,
    pub total_credits: i64,
    pub degraded_queries: usize,
    pub subject_breakdown: HashMap<String, usize>,
}

const QUERY_COLUMNS: &str = "id, requester_id, expert_id, subject, question, response,
     sources, credits_spent, degraded, failure_reason, created_at";

fn row_to_query(row: &rusqlite::Row<'_>) -> rusqlite::Result<QueryRecord> {
    let sources_json: String = row.get(6)?;
    Ok(QueryRecord {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        expert_id: row.get(2)?,
        subject: row.get(3)?,
        question: row.get(4)?,
        response: row.get(5)?,
        sources: serde_json::from_str(&sources_json).unwrap_or_default(),
        credits_spent: row.get(7)?,
        degraded: row.get::<_, i64>(8)? != 0,
        failure_reason: row.get(9)?,
        created_at: row.get(10)?,
    })
}

impl Database {
    /// Insert a new query record, returning its id
    pub fn insert_query(&self, query: &QueryInsert<'_>) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        let sources_json = serde_json::to_string(query.sources)?;
        self.conn.execute(
            "INSERT INTO queries (requester_id, expert_id, subject, question, response,
                 sources, credits_spent, degraded, failure_reason, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                query.requester_id,
                query.expert_id,
                query.subject,
                query.question,
                query.response,
                sources_json,
                query.credits_spent,
                query.degraded as i64,
                query.failure_reason,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get query by id
    pub fn get_query(&self, id: i64) -> Result<QueryRecord> {
        let result = self.conn.query_row(
            &format!("SELECT {} FROM queries WHERE id = ?1", QUERY_COLUMNS),
            params![id],
            row_to_query,
        );

        match result {
            Ok(query) => Ok(query),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(CounselError::QueryNotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// List queries for a requester, newest first
    pub fn queries_by_requester(&self, requester_id: i64) -> Result<Vec<QueryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM queries WHERE requester_id = ?1 ORDER BY id DESC",
            QUERY_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![requester_id], row_to_query)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List queries for an expert, newest first
    pub fn queries_by_expert(&self, expert_id: i64) -> Result<Vec<QueryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM queries WHERE expert_id = ?1 ORDER BY id DESC",
            QUERY_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![expert_id], row_to_query)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List queries for a subject, newest first
    pub fn queries_by_subject(&self, subject: &str) -> Result<Vec<QueryRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM queries WHERE subject = ?1 ORDER BY id DESC",
            QUERY_COLUMNS
        ))?;
        let rows = stmt
            .query_map(params![subject], row_to_query)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// List all queries, newest first
    pub fn list_queries(&self) -> Result<Vec<QueryRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM queries ORDER BY id DESC", QUERY_COLUMNS))?;
        let rows = stmt
            .query_map([], row_to_query)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Delete a query (its embedding row cascades)
    pub fn delete_query(&self, id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM queries WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(CounselError::QueryNotFound(id));
        }
        Ok(())
    }

    /// Count stored queries
    pub fn count_queries(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM queries", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Aggregate analytics, optionally filtered by expert and RFC 3339 date range.
    ///
    /// Degraded answers are counted separately so canned responses are never
    /// reported as live model usage.
    pub fn query_analytics(
        &self,
        expert_id: Option<i64>,
        since: Option<&str>,
        until: Option<&str>,
    ) -> Result<QueryAnalytics> {
        let mut sql = format!("SELECT {} FROM queries WHERE 1=1", QUERY_COLUMNS);
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(expert_id) = expert_id {
            sql.push_str(&format!(" AND expert_id = ?{}", args.len() + 1));
            args.push(Box::new(expert_id));
        }
        if let Some(since) = since {
            sql.push_str(&format!(" AND created_at >= ?{}", args.len() + 1));
            args.push(Box::new(since.to_string()));
        }
        if let Some(until) = until {
            sql.push_str(&format!(" AND created_at <= ?{}", args.len() + 1));
            args.push(Box::new(until.to_string()));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())), row_to_query)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut analytics = QueryAnalytics::default();
        for query in rows {
            analytics.total_queries += 1;
            analytics.total_credits += query.credits_spent;
            if query.degraded {
                analytics.degraded_queries += 1;
            }
            *analytics.subject_breakdown.entry(query.subject).or_insert(0) += 1;
        }
        Ok(analytics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;

    fn seeded_db() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        let requester = db.create_account("alice", None, Role::Client, 10).unwrap();
        let expert = db
            .create_expert("Dr. Chen", &["Leadership".to_string()], None)
            .unwrap();
        (db, requester, expert)
    }

    fn insert_sample(db: &Database, requester: i64, expert: i64, subject: &str, degraded: bool) -> i64 {
        db.insert_query(&QueryInsert {
            requester_id: requester,
            expert_id: expert,
            subject,
            question: "How do I delegate effectively?",
            response: "Delegate by outcome, not by task.",
            sources: &["Expert Knowledge Base".to_string()],
            credits_spent: 1,
            degraded,
            failure_reason: degraded.then_some("connection refused"),
        })
        .unwrap()
    }

    #[test]
    fn query_roundtrip() {
        let (db, requester, expert) = seeded_db();
        let id = insert_sample(&db, requester, expert, "Leadership", false);

        let query = db.get_query(id).unwrap();
        assert_eq!(query.subject, "Leadership");
        assert!(!query.degraded);
        assert!(query.failure_reason.is_none());
        assert_eq!(query.sources, vec!["Expert Knowledge Base".to_string()]);
    }

    #[test]
    fn filters_by_requester_and_subject() {
        let (db, requester, expert) = seeded_db();
        insert_sample(&db, requester, expert, "Leadership", false);
        insert_sample(&db, requester, expert, "Technology", true);

        assert_eq!(db.queries_by_requester(requester).unwrap().len(), 2);
        assert_eq!(db.queries_by_subject("Leadership").unwrap().len(), 1);
        assert_eq!(db.queries_by_expert(expert).unwrap().len(), 2);
        // Newest first
        let all = db.list_queries().unwrap();
        assert!(all[0].id > all[1].id);
    }

    #[test]
    fn analytics_separates_degraded() {
        let (db, requester, expert) = seeded_db();
        insert_sample(&db, requester, expert, "Leadership", false);
        insert_sample(&db, requester, expert, "Leadership", true);
        insert_sample(&db, requester, expert, "Technology", false);

        let analytics = db.query_analytics(None, None, None).unwrap();
        assert_eq!(analytics.total_queries, 3);
        assert_eq!(analytics.total_credits, 3);
        assert_eq!(analytics.degraded_queries, 1);
        assert_eq!(analytics.subject_breakdown["Leadership"], 2);

        let filtered = db.query_analytics(Some(expert + 1), None, None).unwrap();
        assert_eq!(filtered.total_queries, 0);
    }
}
