use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

use crate::domain::RecordId;
use crate::error::StoreError;
use crate::id_allocator::IdPolicy;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any record must implement to be managed by ResourceActor
pub trait Entity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Lowercase name used in log fields and error messages.
    const KIND: &'static str;

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);

    /// Normalizes the record and rejects invalid input before it reaches a store.
    fn validate(&mut self) -> Result<(), String> {
        Ok(())
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    List {
        respond_to: Response<Vec<T>>,
    },
    Get {
        id: RecordId,
        respond_to: Response<T>,
    },
    Create {
        record: T,
        respond_to: Response<T>,
    },
    Update {
        id: RecordId,
        record: T,
        respond_to: Response<T>,
    },
    Delete {
        id: RecordId,
        respond_to: Response<()>,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Sole owner of one collection. Requests are handled one at a time, so
/// writes never interleave with each other or with reads.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    records: Vec<T>,
    id_policy: IdPolicy,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(buffer_size: usize, id_policy: IdPolicy) -> (Self, ResourceClient<T>) {
        Self::with_records(buffer_size, id_policy, Vec::new())
    }

    /// Starts from an existing collection, kept in the given order.
    pub fn with_records(
        buffer_size: usize,
        id_policy: IdPolicy,
        records: Vec<T>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records,
            id_policy,
        };
        (actor, ResourceClient::new(sender))
    }

    #[instrument(name = "resource_actor", fields(kind = T::KIND), skip(self))]
    pub async fn run(mut self) {
        info!(records = self.records.len(), "Store starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List { respond_to } => self.handle_list(respond_to),
                ResourceRequest::Get { id, respond_to } => self.handle_get(id, respond_to),
                ResourceRequest::Create { record, respond_to } => {
                    self.handle_create(record, respond_to)
                }
                ResourceRequest::Update { id, record, respond_to } => {
                    self.handle_update(id, record, respond_to)
                }
                ResourceRequest::Delete { id, respond_to } => self.handle_delete(id, respond_to),
                ResourceRequest::Shutdown => {
                    info!("Store shutting down");
                    break;
                }
            }
        }
        info!("Store stopped");
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn not_found(id: RecordId) -> StoreError {
        StoreError::NotFound { kind: T::KIND, id }
    }

    fn handle_list(&self, respond_to: Response<Vec<T>>) {
        debug!(count = self.records.len(), "Processing list request");
        let _ = respond_to.send(Ok(self.records.clone()));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_get(&self, id: RecordId, respond_to: Response<T>) {
        debug!("Processing get request");
        let result = match self.position(id) {
            Some(index) => Ok(self.records[index].clone()),
            None => {
                debug!("Record not found");
                Err(Self::not_found(id))
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, record, respond_to))]
    fn handle_create(&mut self, mut record: T, respond_to: Response<T>) {
        let id = self.id_policy.next_id(&self.records);
        record.set_id(id);
        self.records.push(record.clone());
        info!(id, "Record created");
        let _ = respond_to.send(Ok(record));
    }

    #[instrument(skip(self, record, respond_to))]
    fn handle_update(&mut self, id: RecordId, mut record: T, respond_to: Response<T>) {
        let result = match self.position(id) {
            Some(index) => {
                record.set_id(id);
                self.records[index] = record.clone();
                info!("Record updated");
                Ok(record)
            }
            None => Err(Self::not_found(id)),
        };
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_delete(&mut self, id: RecordId, respond_to: Response<()>) {
        let result = match self.position(id) {
            Some(index) => {
                self.records.remove(index);
                info!(remaining = self.records.len(), "Record deleted");
                Ok(())
            }
            None => Err(Self::not_found(id)),
        };
        let _ = respond_to.send(result);
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Debug, Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| Self::unavailable("actor closed"))?;
        response
            .await
            .map_err(|_| Self::unavailable("actor dropped"))?
    }

    fn unavailable(reason: &str) -> StoreError {
        StoreError::Unavailable {
            kind: T::KIND,
            reason: reason.to_string(),
        }
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn get(&self, id: RecordId) -> Result<T, StoreError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn create(&self, record: T) -> Result<T, StoreError> {
        self.request(|respond_to| ResourceRequest::Create { record, respond_to })
            .await
    }

    pub async fn update(&self, id: RecordId, record: T) -> Result<T, StoreError> {
        self.request(|respond_to| ResourceRequest::Update { id, record, respond_to })
            .await
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| Self::unavailable("actor closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::domain::{Category, Product};

    fn spawn_store<T: Entity>(policy: IdPolicy, records: Vec<T>) -> ResourceClient<T> {
        let (actor, client) = ResourceActor::with_records(16, policy, records);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_create_ignores_client_id_and_get_returns_same_record() {
        let store = spawn_store::<Product>(IdPolicy::LastPlusOne, Vec::new());

        let mut input = Product::new("Teh", 3000, 5);
        input.id = 77;
        let created = store.create(input).await.unwrap();
        assert_eq!(created.id, 1);

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_appends_after_last_id() {
        let store = spawn_store(IdPolicy::LastPlusOne, Product::seed());
        let created = store.create(Product::new("Susu", 8000, 2)).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(store.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_last_plus_one_reuses_deleted_tail_id() {
        let store = spawn_store(IdPolicy::LastPlusOne, Product::seed());
        store.delete(3).await.unwrap();
        let created = store.create(Product::new("Kecap Manis", 13000, 1)).await.unwrap();
        assert_eq!(created.id, 3);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = spawn_store(IdPolicy::LastPlusOne, Product::seed());
        store.delete(2).await.unwrap();
        assert_eq!(
            store.get(2).await,
            Err(StoreError::NotFound { kind: "product", id: 2 })
        );
        assert_eq!(
            store.delete(2).await,
            Err(StoreError::NotFound { kind: "product", id: 2 })
        );
    }

    #[tokio::test]
    async fn test_delete_preserves_order_of_remaining_records() {
        let store = spawn_store(IdPolicy::LastPlusOne, Product::seed());
        store.delete(2).await.unwrap();
        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_forces_path_id_and_keeps_position() {
        let store = spawn_store(IdPolicy::LastPlusOne, Product::seed());
        let mut replacement = Product::new("Indomie Goreng", 3700, 8);
        replacement.id = 3;

        let updated = store.update(1, replacement).await.unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(store.get(1).await.unwrap(), updated);

        let names: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Indomie Goreng", "Vit 1000ml", "kecap"]);
        // the body id did not touch record 3
        assert_eq!(store.get(3).await.unwrap().name, "kecap");
    }

    #[tokio::test]
    async fn test_update_missing_id_does_not_upsert() {
        let store = spawn_store::<Category>(IdPolicy::LastPlusOne, Vec::new());
        let result = store.update(5, Category::new("Baru", "")).await;
        assert_eq!(result, Err(StoreError::NotFound { kind: "category", id: 5 }));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_category_scenario() {
        let store = spawn_store::<Category>(IdPolicy::LastPlusOne, Vec::new());
        assert_eq!(store.create(Category::new("Makanan", "")).await.unwrap().id, 1);
        assert_eq!(store.create(Category::new("Rumah", "")).await.unwrap().id, 2);
        store.delete(1).await.unwrap();

        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, 2);
        assert_eq!(remaining[0].name, "Rumah");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let store = spawn_store::<Product>(IdPolicy::LastPlusOne, Product::seed());
        let before = store.list().await.unwrap().len();

        let tasks: Vec<_> = (0..100)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(Product::new(format!("p{i}"), i, 1)).await })
            })
            .collect();

        let mut ids = HashSet::new();
        for task in tasks {
            let created = task.await.unwrap().unwrap();
            assert!(ids.insert(created.id), "duplicate id {}", created.id);
        }

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), before + 100);
        let unique: HashSet<_> = all.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), all.len());
    }

    #[tokio::test]
    async fn test_requests_after_shutdown_are_unavailable() {
        let (actor, store) = ResourceActor::<Category>::new(4, IdPolicy::LastPlusOne);
        let handle = tokio::spawn(actor.run());

        store.shutdown().await.unwrap();
        handle.await.unwrap();

        assert!(matches!(
            store.list().await,
            Err(StoreError::Unavailable { kind: "category", .. })
        ));
    }
}
