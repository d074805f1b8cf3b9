//! Repository behaviour against a real ScyllaDB node.
//!
//! Needs Docker. Run with `cargo test -- --ignored`.

use chrono::{SubsecRound, Utc};
use message_store_service::config::ScyllaConfig;
use message_store_service::db;
use message_store_service::models::Message;
use message_store_service::repository::{
    MessageRepository, PagingCursor, ScyllaMessageRepository, StoreError,
};
use std::collections::HashSet;
use testcontainers::{core::WaitFor, runners::AsyncRunner, ContainerAsync, GenericImage};
use uuid::Uuid;

async fn start_scylla() -> anyhow::Result<(ContainerAsync<GenericImage>, ScyllaConfig)> {
    let image = GenericImage::new("scylladb/scylla", "5.4")
        .with_exposed_port(9042)
        .with_wait_for(WaitFor::message_on_stderr(
            "Starting listening for CQL clients",
        ));

    let container = image.start().await?;
    let port = container.get_host_port_ipv4(9042).await?;

    let config = ScyllaConfig {
        hosts: vec![format!("127.0.0.1:{port}")],
        keyspace: "messaging_test".to_string(),
        connect_max_attempts: 30,
        request_timeout_secs: 30,
        ..ScyllaConfig::default()
    };
    Ok((container, config))
}

async fn repository(config: &ScyllaConfig) -> anyhow::Result<ScyllaMessageRepository> {
    let session = db::connect(config).await?;
    db::ensure_schema(&session, config).await?;

    let repo =
        ScyllaMessageRepository::new(session, &config.keyspace, config.request_timeout()).await?;
    Ok(repo)
}

fn message(body: &str) -> Message {
    Message {
        id: Uuid::now_v7(),
        conversation_id: Uuid::now_v7(),
        sender_id: Uuid::now_v7(),
        created_at: Utc::now().trunc_subsecs(3),
        updated_at: None,
        body: body.to_string(),
        is_soft_deleted: false,
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_scylla_repository_round_trip() -> anyhow::Result<()> {
    let (_container, config) = start_scylla().await?;
    let repo = repository(&config).await?;

    repo.health_check().await?;

    let original = message("hello");
    repo.create(&original).await?;
    assert_eq!(repo.get(original.id).await?, original);

    // same conversation: plain overwrite
    let mut edit = original.clone();
    edit.body = "edited".into();
    edit.updated_at = Some(Utc::now().trunc_subsecs(3));
    edit.created_at = Utc::now().trunc_subsecs(3) + chrono::Duration::seconds(60);
    let updated = repo.update(original.id, &edit).await?;
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(repo.get(original.id).await?, updated);

    // new conversation: the old clustering row must be gone
    let mut moved = updated.clone();
    moved.conversation_id = Uuid::now_v7();
    repo.update(original.id, &moved).await?;
    let all = repo.list().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].conversation_id, moved.conversation_id);

    repo.delete(original.id).await?;
    assert!(matches!(
        repo.get(original.id).await,
        Err(StoreError::NotFound(_))
    ));
    repo.delete(original.id).await?;

    let missing = repo.update(original.id, &moved).await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));

    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_scylla_paged_scan_is_exhaustive() -> anyhow::Result<()> {
    let (_container, config) = start_scylla().await?;
    let repo = repository(&config).await?;

    let mut ids = HashSet::new();
    for i in 0..23 {
        let m = message(&format!("message {i}"));
        repo.create(&m).await?;
        ids.insert(m.id);
    }

    for page_size in [1, 10, 24] {
        let mut seen = Vec::new();
        let mut cursor: Option<PagingCursor> = None;
        loop {
            let page = repo.list_paged(Some(page_size), cursor).await?;
            assert!(page.messages.len() <= page_size as usize);
            seen.extend(page.messages.iter().map(|m| m.id));

            // hand the cursor back in its wire form
            cursor = match page.next_cursor {
                Some(next) => PagingCursor::decode(&next.encode())?,
                None => break,
            };
        }

        let unique: HashSet<Uuid> = seen.iter().copied().collect();
        assert_eq!(seen.len(), ids.len(), "page_size {page_size}");
        assert_eq!(unique, ids, "page_size {page_size}");
    }

    Ok(())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_scylla_rejects_garbage_paging_state() -> anyhow::Result<()> {
    let (_container, config) = start_scylla().await?;
    let repo = repository(&config).await?;
    repo.create(&message("only")).await?;

    let garbage = PagingCursor::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
    let result = repo.list_paged(Some(5), garbage).await;

    assert!(
        matches!(result, Err(StoreError::InvalidCursor(_))),
        "got {result:?}"
    );

    Ok(())
}
