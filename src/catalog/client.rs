//! HTTP client for the remote products API.
//!
//! The API is a json-server style resource: `GET /products` with optional
//! `_sort`, `name_like` and attribute filters, `GET /products/{id}`,
//! `POST /products` and `PUT /products/{id}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::models::{Product, ProductQuery};
use crate::errors::DataApiError;

/// Read side of the products API.
/// Real implementation: `ProductsApi`. Test double: `fakes::FakeProducts`.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self, query: &ProductQuery) -> Result<Vec<Product>, DataApiError>;

    /// Returns `Ok(None)` when the API has no product with this id.
    async fn find(&self, id: &str) -> Result<Option<Product>, DataApiError>;
}

/// Write side of the products API.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn register(&self, product: &Product) -> Result<(), DataApiError>;

    async fn update(&self, id: &str, product: &Product) -> Result<(), DataApiError>;
}

#[derive(Debug, Clone)]
pub struct ProductsApi {
    http: reqwest::Client,
    base_url: Url,
}

impl ProductsApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DataApiError> {
        // Url::join drops the last path segment unless it ends with a slash
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).map_err(|_| DataApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(DataApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DataApiError::Other(anyhow::Error::new(e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, DataApiError> {
        self.base_url
            .join(path)
            .map_err(|_| DataApiError::InvalidBaseUrl(format!("{}{}", self.base_url, path)))
    }

    fn product_url(&self, id: &str) -> Result<Url, DataApiError> {
        let mut url = self.url("products")?;
        url.path_segments_mut()
            .map_err(|_| DataApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .push(id);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: &Url) -> Result<reqwest::Response, DataApiError> {
        let resp = request.send().await.map_err(|source| DataApiError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataApiError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(resp)
    }
}

#[async_trait]
impl ProductSource for ProductsApi {
    async fn fetch(&self, query: &ProductQuery) -> Result<Vec<Product>, DataApiError> {
        let url = self.url("products")?;
        let pairs = query.to_query_pairs();
        debug!(%url, ?pairs, "Fetching products");

        let resp = self.send(self.http.get(url.clone()).query(&pairs), &url).await?;
        resp.json::<Vec<Product>>()
            .await
            .map_err(|source| DataApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn find(&self, id: &str) -> Result<Option<Product>, DataApiError> {
        let url = self.product_url(id)?;
        debug!(%url, "Fetching product");

        let resp = match self.send(self.http.get(url.clone()), &url).await {
            Ok(resp) => resp,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        resp.json::<Product>()
            .await
            .map(Some)
            .map_err(|source| DataApiError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ProductRepository for ProductsApi {
    async fn register(&self, product: &Product) -> Result<(), DataApiError> {
        let url = self.url("products")?;
        debug!(%url, id = %product.id, "Registering product");
        self.send(self.http.post(url.clone()).json(product), &url).await?;
        Ok(())
    }

    async fn update(&self, id: &str, product: &Product) -> Result<(), DataApiError> {
        let url = self.product_url(id)?;
        debug!(%url, "Updating product");
        self.send(self.http.put(url.clone()).json(product), &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{ProductFilter, SortField};
    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        routing::get,
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<String>>>;

    fn product(id: &str, name: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            sku: format!("SKU-{}", id),
            price,
            is_favorite: false,
            created_at: "01/01/2024".to_string(),
            updated_at: "01/01/2024".to_string(),
            updated_by: "tester".to_string(),
            image: None,
        }
    }

    async fn list_products(
        State(seen): State<Seen>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Vec<Product>> {
        let mut keys: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        keys.sort();
        seen.lock().unwrap().push(format!("GET /products?{}", keys.join("&")));
        Json(vec![product("1", "Fogão", 10.0), product("2", "Geladeira", 5.0)])
    }

    async fn create_product(State(seen): State<Seen>, Json(body): Json<Product>) -> StatusCode {
        seen.lock().unwrap().push(format!("POST /products {}", body.id));
        StatusCode::CREATED
    }

    async fn get_product(Path(id): Path<String>) -> Result<Json<Product>, StatusCode> {
        if id == "1" {
            Ok(Json(product("1", "Fogão", 10.0)))
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }

    async fn put_product(
        State(seen): State<Seen>,
        Path(id): Path<String>,
        Json(body): Json<Product>,
    ) -> StatusCode {
        seen.lock().unwrap().push(format!("PUT /products/{} {}", id, body.name));
        if id == "broken" {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }

    /// Start a stub products API on an ephemeral port.
    /// Returns `None` in sandboxes that forbid binding sockets.
    async fn stub_api() -> Option<(ProductsApi, Seen)> {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/products/{id}", get(get_product).put(put_product))
            .with_state(seen.clone());

        let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(e) => {
                eprintln!("Skipping client test (sandbox): {:?}", e);
                return None;
            }
        };
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = ProductsApi::new(&format!("http://{}", addr), Duration::from_secs(5)).unwrap();
        Some((api, seen))
    }

    #[test]
    fn test_new_rejects_garbage_base_url() {
        let err = ProductsApi::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, DataApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let api = ProductsApi::new("http://localhost:3333/api", Duration::from_secs(1)).unwrap();
        assert_eq!(api.url("products").unwrap().as_str(), "http://localhost:3333/api/products");
        assert_eq!(
            api.product_url("a b").unwrap().as_str(),
            "http://localhost:3333/api/products/a%20b"
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_query_params() {
        let Some((api, seen)) = stub_api().await else { return };

        let all = api.fetch(&ProductQuery::All).await.unwrap();
        assert_eq!(all.len(), 2);
        api.fetch(&ProductQuery::SortedBy(SortField::Price)).await.unwrap();
        api.fetch(&ProductQuery::NameLike("gel".into())).await.unwrap();
        api.fetch(&ProductQuery::Filtered(ProductFilter::favorites()))
            .await
            .unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                "GET /products?".to_string(),
                "GET /products?_sort=price".to_string(),
                "GET /products?name_like=gel".to_string(),
                "GET /products?favorite=true".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_find_maps_404_to_none() {
        let Some((api, _)) = stub_api().await else { return };

        let found = api.find("1").await.unwrap();
        assert_eq!(found.unwrap().name, "Fogão");
        assert!(api.find("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_register_posts_full_product() {
        let Some((api, seen)) = stub_api().await else { return };

        api.register(&product("new-id", "Micro-ondas", 99.0)).await.unwrap();
        assert_eq!(seen.lock().unwrap().as_slice(), ["POST /products new-id"]);
    }

    #[tokio::test]
    async fn test_update_puts_by_id_and_reports_status_errors() {
        let Some((api, seen)) = stub_api().await else { return };

        api.update("1", &product("1", "Fogão 4 bocas", 10.0)).await.unwrap();
        let err = api
            .update("broken", &product("broken", "X", 1.0))
            .await
            .unwrap_err();
        match err {
            DataApiError::Status { status, .. } => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
        assert_eq!(seen.lock().unwrap()[0], "PUT /products/1 Fogão 4 bocas");
    }

    #[tokio::test]
    async fn test_transport_error_when_api_unreachable() {
        // Port 9 (discard) is closed on test machines
        let api = ProductsApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = api.fetch(&ProductQuery::All).await.unwrap_err();
        assert!(matches!(err, DataApiError::Transport { .. }));
    }
}
