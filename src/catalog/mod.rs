//! Product catalog — server-rendered front-end over a products REST API.
//!
//! ## Overview
//!
//! The catalog renders a home page listing products with search, sort and
//! favorite-filter controls, and a modal editor for creating and editing a
//! product. Products live in a remote json-server style API; this crate owns
//! no persistent state.
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────┐   HTTP   ┌──────────────────────────────────────────────────┐
//! │ Browser  │ ───────> │  server.rs  (axum Router, ServerConfig)          │
//! │          │ <─────── │    └─ api.rs  (page handlers, AppState)          │
//! └──────────┘   HTML   │         │                                        │
//!                       │         │ SessionConfig::authenticate()          │
//!                       │         v                                        │
//!                       │  session.rs  (cookie gate → Session)             │
//!                       │         │                                        │
//!                       │         ├─ ListController::{load_all, search, …} │
//!                       │         │    list.rs                             │
//!                       │         └─ ProductEditor::submit()               │
//!                       │              editor.rs                           │
//!                       │         │                                        │
//!                       │         v                                        │
//!                       │  client.rs  (ProductSource / ProductRepository)  │
//!                       └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Supporting Modules
//!
//! | Module   | Responsibility                                             |
//! |----------|------------------------------------------------------------|
//! | `models` | `Product`, `SortField`, `ProductFilter`, `ProductQuery`    |
//! | `pages`  | maud templates for home, editor and sign-in pages          |
//!
//! ## Typical Request Flow (sort by price)
//!
//! 1. `GET /?sort=price` → `api::home()`
//! 2. The session cookie is checked first; anonymous visitors are redirected
//!    to `/signin` before any product request is made.
//! 3. `ListController::order_by(SortField::Price)` issues
//!    `GET /products?_sort=price` through `ProductsApi`.
//! 4. The resulting `ListState` is rendered by `pages::home()`.

pub mod api;
pub mod client;
pub mod editor;
pub mod list;
pub mod models;
pub mod pages;
pub mod server;
pub mod session;

#[cfg(test)]
pub(crate) mod fakes;
