//! Current product snapshot

use crate::api::types::Product;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Default)]
struct Snapshot {
    products: Option<Arc<Vec<Product>>>,
    generation: u64,
}

/// Latest product snapshot. Replaced wholesale, never patched.
///
/// Every replacement bumps the generation, so a load that started before
/// a newer snapshot landed can be discarded instead of overwriting it.
#[derive(Default)]
pub struct ProductStore {
    snapshot: RwLock<Snapshot>,
}

impl ProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot; empty before the first load
    pub fn snapshot(&self) -> Arc<Vec<Product>> {
        self.snapshot.read().products.clone().unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.read().products.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.snapshot.read().generation
    }

    pub fn replace(&self, products: Vec<Product>) {
        tracing::info!("Loaded {} products into snapshot", products.len());
        let mut snapshot = self.snapshot.write();
        snapshot.products = Some(Arc::new(products));
        snapshot.generation += 1;
    }

    /// Replace only if nothing was stored since `seen` was read
    pub fn replace_if_unchanged(&self, products: Vec<Product>, seen: u64) -> bool {
        let mut snapshot = self.snapshot.write();
        if snapshot.generation != seen {
            tracing::debug!("Discarding product load superseded by a newer snapshot");
            return false;
        }
        tracing::info!("Loaded {} products into snapshot", products.len());
        snapshot.products = Some(Arc::new(products));
        snapshot.generation += 1;
        true
    }

    pub fn find(&self, id: i64) -> Option<Product> {
        self.snapshot
            .read()
            .products
            .as_ref()
            .and_then(|products| products.iter().find(|p| p.id == id).cloned())
    }
}
