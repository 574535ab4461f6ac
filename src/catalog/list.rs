//! Product list controller.
//!
//! Owns the displayed product collection together with the current
//! search/sort/filter intent, and re-queries the products API whenever the
//! user changes that intent.
//!
//! Every operation bumps a generation counter before it issues its request.
//! A response is applied only if no newer operation started while it was in
//! flight, so a slow `search` can never overwrite the result of a later
//! `order_by`. The loading flag is cleared only when the latest request
//! settles. Failures are logged and swallowed: the previous product list
//! stays on screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use super::client::ProductSource;
use super::models::{Product, ProductFilter, ProductQuery, SortField};

/// Observable state of the product list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub products: Vec<Product>,
    pub search_term: String,
    pub is_loading: bool,
    /// Query whose response is currently displayed.
    pub active_query: Option<ProductQuery>,
}

/// What happened to one list operation's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Applied { count: usize },
    /// The request failed; the previous products were kept.
    Failed,
    /// A newer operation started before this one settled; response dropped.
    Superseded,
}

pub struct ListController<S: ProductSource + ?Sized> {
    source: Arc<S>,
    state: Mutex<ListState>,
    generation: AtomicU64,
}

impl<S: ProductSource + ?Sized> ListController<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            state: Mutex::new(ListState::default()),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ListState {
        self.state().clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state().products.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn search_term(&self) -> String {
        self.state().search_term.clone()
    }

    /// Record the search box content without querying.
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.state().search_term = term.into();
    }

    /// Initial load: every product, sorted by name.
    pub async fn load_all(&self) -> ListOutcome {
        self.run(ProductQuery::SortedBy(SortField::Name)).await
    }

    pub async fn search(&self, term: &str) -> ListOutcome {
        self.set_search_term(term);
        self.run(ProductQuery::NameLike(term.to_string())).await
    }

    pub async fn filter(&self, filter: ProductFilter) -> ListOutcome {
        self.run(ProductQuery::Filtered(filter)).await
    }

    pub async fn filter_favorites(&self) -> ListOutcome {
        self.filter(ProductFilter::favorites()).await
    }

    pub async fn order_by(&self, field: SortField) -> ListOutcome {
        self.run(ProductQuery::SortedBy(field)).await
    }

    pub async fn clear_filters(&self) -> ListOutcome {
        self.set_search_term(String::new());
        self.run(ProductQuery::All).await
    }

    async fn run(&self, query: ProductQuery) -> ListOutcome {
        // Bumped under the state lock so a superseded request cannot raise
        // the loading flag after the latest one has cleared it.
        let generation = {
            let mut state = self.state();
            state.is_loading = true;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let result = self.source.fetch(&query).await;

        let mut state = self.state();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(?query, generation, "Discarding superseded product list response");
            return ListOutcome::Superseded;
        }
        state.is_loading = false;

        match result {
            Ok(products) => {
                let count = products.len();
                state.products = products;
                state.active_query = Some(query);
                ListOutcome::Applied { count }
            }
            Err(e) => {
                warn!(?query, error = %e, "Failed to load products; keeping previous list");
                ListOutcome::Failed
            }
        }
    }
}
