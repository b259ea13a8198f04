//! Tests for the service factory and trait-object surface.

use super::*;

fn queue() -> QueueName {
    "orders".parse().unwrap()
}

#[tokio::test]
async fn test_factory_creates_in_memory_service() {
    let service = QueueServiceFactory::create(BackendConfig::InMemory).unwrap();
    assert!(service
        .pull(&queue(), Duration::zero())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_factory_creates_file_service() {
    let dir = tempfile::tempdir().unwrap();
    let service = QueueServiceFactory::create(BackendConfig::File(FileStoreConfig {
        root: dir.path().to_path_buf(),
    }))
    .unwrap();

    service
        .push(&queue(), Bytes::from_static(b"configured"))
        .await
        .unwrap();
    assert!(dir.path().join("orders").is_dir());
}

#[tokio::test]
async fn test_backends_share_the_same_contract() {
    let dir = tempfile::tempdir().unwrap();
    let services: Vec<Box<dyn QueueService>> = vec![
        QueueServiceFactory::create(BackendConfig::InMemory).unwrap(),
        QueueServiceFactory::create(BackendConfig::File(FileStoreConfig {
            root: dir.path().to_path_buf(),
        }))
        .unwrap(),
    ];

    for service in &services {
        service
            .push(&queue(), Bytes::from_static(b"same everywhere"))
            .await
            .unwrap();
        let message = service
            .pull(&queue(), Duration::zero())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(message.body, Bytes::from_static(b"same everywhere"));

        service
            .delete(&queue(), &message.receipt_handle)
            .await
            .unwrap();
        assert!(service
            .pull(&queue(), Duration::zero())
            .await
            .unwrap()
            .is_none());
    }
}

#[tokio::test]
async fn test_create_test_service() {
    let service = QueueServiceFactory::create_test_service();
    service
        .push(&queue(), Bytes::from_static(b"test"))
        .await
        .unwrap();
    assert!(service
        .pull(&queue(), Duration::seconds(5))
        .await
        .unwrap()
        .is_some());
}
