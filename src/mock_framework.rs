//! # Mock Framework
//!
//! Utilities for testing code that talks to a store without spinning up a
//! [`ResourceActor`](crate::actor_framework::ResourceActor).
//!
//! [`create_mock_client`] returns a client and the receiving end of its
//! channel. The test plays the actor: it pulls requests with helpers like
//! [`expect_create`] and answers them, or proves with [`assert_no_request`]
//! that nothing was sent at all.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response};
use crate::domain::RecordId;

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { record, respond_to }) => Some((record, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(RecordId, T, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, record, respond_to }) => Some((id, record, respond_to)),
        _ => None,
    }
}

/// Panics if any request is waiting in the channel.
pub fn assert_no_request<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) {
    match receiver.try_recv() {
        Err(TryRecvError::Empty) => {}
        Err(TryRecvError::Disconnected) => {}
        Ok(request) => panic!("unexpected store request: {request:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;
    use crate::error::StoreError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let update_task = tokio::spawn(async move {
            client.update(4, Product::new("Roti", 9000, 3)).await
        });

        let (id, record, responder) = expect_update(&mut receiver)
            .await
            .expect("Expected Update request");
        assert_eq!(id, 4);
        assert_eq!(record.name, "Roti");
        responder
            .send(Err(StoreError::NotFound { kind: "product", id }))
            .unwrap();

        let result = update_task.await.unwrap();
        assert_eq!(result, Err(StoreError::NotFound { kind: "product", id: 4 }));
        assert_no_request(&mut receiver);
    }
}
