use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::domain::{Category, Product};

/// Owns the product and category stores for the lifetime of the process.
///
/// Each store runs as its own actor task, so the two collections never share
/// a lock and no request ever waits on both.
pub struct CatalogSystem {
    pub product_client: ResourceClient<Product>,
    pub category_client: ResourceClient<Category>,
    handles: Vec<JoinHandle<()>>,
}

impl CatalogSystem {
    pub fn new(config: &Config) -> Self {
        let buffer_size = config.store_buffer.get();
        let (products, categories) = if config.seed {
            (Product::seed(), Category::seed())
        } else {
            (Vec::new(), Vec::new())
        };

        let (product_actor, product_client) =
            ResourceActor::with_records(buffer_size, config.id_policy, products);
        let product_handle = tokio::spawn(product_actor.run());

        let (category_actor, category_client) =
            ResourceActor::with_records(buffer_size, config.id_policy, categories);
        let category_handle = tokio::spawn(category_actor.run());

        info!(id_policy = ?config.id_policy, seeded = config.seed, "Catalog stores started");

        Self {
            product_client,
            category_client,
            handles: vec![product_handle, category_handle],
        }
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.product_client.clone(), self.category_client.clone())
    }

    /// Stops both stores after they drain the requests already queued.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");

        // a store that already stopped has nothing left to drain
        let _ = self.product_client.shutdown().await;
        let _ = self.category_client.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}
