//! In-memory test double for the products API.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::client::{ProductRepository, ProductSource};
use super::models::{Product, ProductQuery, SortField};
use crate::errors::DataApiError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(ProductQuery),
    Find(String),
    Register(Product),
    Update(String, Product),
}

#[derive(Default)]
struct Inner {
    products: Vec<Product>,
    calls: Vec<Call>,
    fail_fetch: bool,
    fail_writes: bool,
    /// Fetches park on these receivers, in order, before answering.
    gates: VecDeque<oneshot::Receiver<()>>,
}

/// Serves a fixed product set, records every call, and can be told to fail.
#[derive(Clone, Default)]
pub struct FakeProducts {
    inner: Arc<Mutex<Inner>>,
}

impl FakeProducts {
    pub fn with_products(products: Vec<Product>) -> Self {
        let fake = Self::default();
        fake.inner.lock().unwrap().products = products;
        fake
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.inner.lock().unwrap().fail_fetch = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Hold the next fetch until the returned sender fires.
    pub fn gate_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().unwrap().gates.push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn stored(&self) -> Vec<Product> {
        self.inner.lock().unwrap().products.clone()
    }

    fn unavailable() -> DataApiError {
        DataApiError::Other(anyhow::anyhow!("products API unavailable"))
    }
}

pub fn product(id: &str, name: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        sku: format!("SKU-{}", id),
        price,
        is_favorite: false,
        created_at: "01/01/2024".to_string(),
        updated_at: "01/01/2024".to_string(),
        updated_by: "seed".to_string(),
        image: None,
    }
}

#[async_trait]
impl ProductSource for FakeProducts {
    async fn fetch(&self, query: &ProductQuery) -> Result<Vec<Product>, DataApiError> {
        let gate = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(Call::Fetch(query.clone()));
            inner.gates.pop_front()
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let inner = self.inner.lock().unwrap();
        if inner.fail_fetch {
            return Err(Self::unavailable());
        }
        let mut products = inner.products.clone();
        match query {
            ProductQuery::All => {}
            ProductQuery::SortedBy(SortField::Name) => {
                products.sort_by(|a, b| a.name.cmp(&b.name));
            }
            ProductQuery::SortedBy(SortField::Price) => {
                products.sort_by(|a, b| a.price.total_cmp(&b.price));
            }
            ProductQuery::NameLike(term) => products.retain(|p| p.name.contains(term.as_str())),
            ProductQuery::Filtered(filter) => products.retain(|p| p.is_favorite == filter.value),
        }
        Ok(products)
    }

    async fn find(&self, id: &str) -> Result<Option<Product>, DataApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Find(id.to_string()));
        if inner.fail_fetch {
            return Err(Self::unavailable());
        }
        Ok(inner.products.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl ProductRepository for FakeProducts {
    async fn register(&self, product: &Product) -> Result<(), DataApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Register(product.clone()));
        if inner.fail_writes {
            return Err(Self::unavailable());
        }
        inner.products.push(product.clone());
        Ok(())
    }

    async fn update(&self, id: &str, product: &Product) -> Result<(), DataApiError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::Update(id.to_string(), product.clone()));
        if inner.fail_writes {
            return Err(Self::unavailable());
        }
        if let Some(existing) = inner.products.iter_mut().find(|p| p.id == id) {
            *existing = product.clone();
        }
        Ok(())
    }
}
