//! CQL for the keyspace and the `messages` table.
//!
//! Both statements are idempotent and run on every start.

pub fn create_keyspace(keyspace: &str, replication_factor: u32) -> String {
    format!(
        "CREATE KEYSPACE IF NOT EXISTS {keyspace} WITH replication = \
         {{'class': 'SimpleStrategy', 'replication_factor': {replication_factor}}}"
    )
}

/// `id` is the partition key and `conversation_id` the clustering column.
pub fn create_messages_table(keyspace: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {keyspace}.messages (\
         id uuid, \
         conversation_id uuid, \
         sender_id uuid, \
         created_at timestamp, \
         updated_at timestamp, \
         body text, \
         is_soft_deleted boolean, \
         PRIMARY KEY ((id), conversation_id))"
    )
}
