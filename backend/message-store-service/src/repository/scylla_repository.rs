use super::{effective_page_size, MessagePage, MessageRepository, PagingCursor, StoreError};
use crate::models::Message;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use resilience::with_timeout;
use scylla::batch::{Batch, BatchType};
use scylla::frame::value::CqlTimestamp;
use scylla::prepared_statement::PreparedStatement;
use scylla::transport::errors::{DbError, QueryError};
use scylla::Session;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

const COLUMNS: &str = "id, conversation_id, sender_id, created_at, updated_at, body, is_soft_deleted";

/// Row as read back from the cluster.
///
/// Only the key columns are guaranteed to be set; rows written by other
/// clients may leave the rest null.
#[derive(Debug, scylla::macros::FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Option<Uuid>,
    created_at: Option<CqlTimestamp>,
    updated_at: Option<CqlTimestamp>,
    body: Option<String>,
    is_soft_deleted: Option<bool>,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: row.id,
            conversation_id: row.conversation_id,
            sender_id: row.sender_id.unwrap_or_else(Uuid::nil),
            created_at: row
                .created_at
                .map(from_cql_timestamp)
                .transpose()?
                .unwrap_or_default(),
            updated_at: row.updated_at.map(from_cql_timestamp).transpose()?,
            body: row.body.unwrap_or_default(),
            is_soft_deleted: row.is_soft_deleted.unwrap_or(false),
        })
    }
}

fn to_cql_timestamp(ts: DateTime<Utc>) -> CqlTimestamp {
    CqlTimestamp(ts.timestamp_millis())
}

fn from_cql_timestamp(ts: CqlTimestamp) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ts.0)
        .ok_or_else(|| StoreError::Storage(format!("stored timestamp {} is out of range", ts.0)))
}

type InsertValues<'a> = (
    Uuid,
    Uuid,
    Uuid,
    CqlTimestamp,
    Option<CqlTimestamp>,
    &'a str,
    bool,
);

fn insert_values(message: &Message) -> InsertValues<'_> {
    (
        message.id,
        message.conversation_id,
        message.sender_id,
        to_cql_timestamp(message.created_at),
        message.updated_at.map(to_cql_timestamp),
        message.body.as_str(),
        message.is_soft_deleted,
    )
}

fn storage_error(operation: &str, e: QueryError) -> StoreError {
    error!(operation, error = %e, "scylla query failed");
    StoreError::Storage(e.to_string())
}

/// A supplied paging state that the coordinator refuses is the client's
/// fault, not a storage failure.
fn paged_query_error(e: QueryError, cursor_supplied: bool) -> StoreError {
    match e {
        QueryError::DbError(DbError::Invalid | DbError::ProtocolError, msg) if cursor_supplied => {
            debug!(error = %msg, "paging state rejected by coordinator");
            StoreError::InvalidCursor(msg)
        }
        other => storage_error("list_paged", other),
    }
}

/// Prepared statements for the `messages` table.
struct Statements {
    insert: PreparedStatement,
    select_one: PreparedStatement,
    select_all: PreparedStatement,
    delete_partition: PreparedStatement,
    delete_row: PreparedStatement,
}

impl Statements {
    async fn prepare(session: &Session, keyspace: &str) -> Result<Self, QueryError> {
        let table = format!("{keyspace}.messages");
        Ok(Self {
            insert: session
                .prepare(format!(
                    "INSERT INTO {table} ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
                ))
                .await?,
            select_one: session
                .prepare(format!("SELECT {COLUMNS} FROM {table} WHERE id = ? LIMIT 1"))
                .await?,
            select_all: session
                .prepare(format!("SELECT {COLUMNS} FROM {table}"))
                .await?,
            delete_partition: session
                .prepare(format!("DELETE FROM {table} WHERE id = ?"))
                .await?,
            delete_row: session
                .prepare(format!(
                    "DELETE FROM {table} WHERE id = ? AND conversation_id = ?"
                ))
                .await?,
        })
    }
}

/// Message repository on a ScyllaDB / Cassandra session.
///
/// Consistency comes from the session's default execution profile. Every
/// driver call is bounded by `request_timeout`; dropping the returned future
/// abandons the call.
pub struct ScyllaMessageRepository {
    session: Arc<Session>,
    statements: Statements,
    request_timeout: Duration,
}

impl ScyllaMessageRepository {
    /// Prepare all statements against `keyspace`. The schema must exist.
    pub async fn new(
        session: Arc<Session>,
        keyspace: &str,
        request_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let statements = with_timeout(request_timeout, Statements::prepare(&session, keyspace))
            .await?
            .map_err(|e| storage_error("prepare", e))?;

        Ok(Self {
            session,
            statements,
            request_timeout,
        })
    }

    async fn run<T, F>(&self, operation: &str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, QueryError>>,
    {
        with_timeout(self.request_timeout, call)
            .await
            .map_err(|e| {
                error!(operation, timeout = ?e.0, "scylla call timed out");
                StoreError::from(e)
            })?
            .map_err(|e| storage_error(operation, e))
    }

    async fn fetch(&self, id: Uuid) -> Result<Message, StoreError> {
        let result = self
            .run("get", self.session.execute(&self.statements.select_one, (id,)))
            .await?;

        let row = result
            .maybe_first_row_typed::<MessageRow>()
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(Message::try_from)
            .transpose()?
            .ok_or(StoreError::NotFound(id))
    }
}

#[async_trait::async_trait]
impl MessageRepository for ScyllaMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, StoreError> {
        self.run(
            "create",
            self.session
                .execute(&self.statements.insert, insert_values(message)),
        )
        .await?;

        debug!(message_id = %message.id, "message stored");
        Ok(message.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Message, StoreError> {
        self.fetch(id).await
    }

    async fn list(&self) -> Result<Vec<Message>, StoreError> {
        let scan = async {
            let mut rows = self
                .session
                .execute_iter(self.statements.select_all.clone(), ())
                .await
                .map_err(|e| storage_error("list", e))?
                .into_typed::<MessageRow>();

            let mut messages = Vec::new();
            while let Some(row) = rows
                .try_next()
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?
            {
                messages.push(Message::try_from(row)?);
            }
            Ok::<_, StoreError>(messages)
        };

        let messages = with_timeout(self.request_timeout, scan).await??;
        debug!(count = messages.len(), "listed all messages");
        Ok(messages)
    }

    async fn list_paged(
        &self,
        page_size: Option<i32>,
        cursor: Option<PagingCursor>,
    ) -> Result<MessagePage, StoreError> {
        let mut statement = self.statements.select_all.clone();
        statement.set_page_size(effective_page_size(page_size));

        let cursor_supplied = cursor.is_some();
        let paging_state = cursor.map(PagingCursor::into_bytes);

        let result = with_timeout(
            self.request_timeout,
            self.session.execute_paged(&statement, (), paging_state),
        )
        .await?
        .map_err(|e| paged_query_error(e, cursor_supplied))?;

        let next_cursor = result.paging_state.clone().and_then(PagingCursor::from_bytes);
        let messages = result
            .rows_typed::<MessageRow>()
            .map_err(|e| StoreError::Storage(e.to_string()))?
            .map(|row| {
                row.map_err(|e| StoreError::Storage(e.to_string()))
                    .and_then(Message::try_from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MessagePage {
            messages,
            next_cursor,
        })
    }

    async fn update(&self, id: Uuid, message: &Message) -> Result<Message, StoreError> {
        let existing = self.fetch(id).await?;
        let updated = Message {
            id,
            created_at: existing.created_at,
            ..message.clone()
        };

        if existing.conversation_id == updated.conversation_id {
            self.run(
                "update",
                self.session
                    .execute(&self.statements.insert, insert_values(&updated)),
            )
            .await?;
        } else {
            // conversation_id is a clustering column: move the row inside its
            // partition atomically.
            let mut batch = Batch::new(BatchType::Logged);
            batch.append_statement(self.statements.delete_row.clone());
            batch.append_statement(self.statements.insert.clone());

            self.run(
                "update",
                self.session.batch(
                    &batch,
                    (
                        (id, existing.conversation_id),
                        insert_values(&updated),
                    ),
                ),
            )
            .await?;
        }

        debug!(message_id = %id, "message updated");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.run(
            "delete",
            self.session
                .execute(&self.statements.delete_partition, (id,)),
        )
        .await?;

        debug!(message_id = %id, "message deleted");
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.run(
            "health_check",
            self.session.query("SELECT now() FROM system.local", ()),
        )
        .await?;
        Ok(())
    }
}
