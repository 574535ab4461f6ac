use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::client::{ProductRepository, ProductSource};
use super::editor::{DismissReason, ProductEditor, ProductForm};
use super::list::ListController;
use super::models::{FilterField, ProductFilter, SortField};
use super::pages::{self, EditorNotice};
use super::session::{Session, SessionConfig};
use crate::errors::SubmitError;

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub source: Arc<dyn ProductSource>,
    pub repository: Arc<dyn ProductRepository>,
    pub session: SessionConfig,
}

pub type SharedState = Arc<AppState>;

// ── Request payload types ─────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub clear: Option<String>,
}

/// The list operation a home page request asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum HomeAction {
    LoadAll,
    Search(String),
    OrderBy(SortField),
    Filter(ProductFilter),
    Clear,
}

impl HomeParams {
    /// Precedence: clear, search, sort, filter.
    pub fn action(&self) -> Result<HomeAction, PageError> {
        if self.clear.is_some() {
            return Ok(HomeAction::Clear);
        }
        if let Some(term) = &self.q {
            return Ok(HomeAction::Search(term.clone()));
        }
        if let Some(sort) = &self.sort {
            let field = sort.parse::<SortField>().map_err(PageError::BadRequest)?;
            return Ok(HomeAction::OrderBy(field));
        }
        if let Some(filter) = &self.filter {
            let field = filter.parse::<FilterField>().map_err(PageError::BadRequest)?;
            return Ok(HomeAction::Filter(ProductFilter { field, value: true }));
        }
        Ok(HomeAction::LoadAll)
    }
}

#[derive(Debug, Deserialize)]
pub struct DismissParams {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SigninForm {
    #[serde(default)]
    pub name: String,
}

// ── Error handling ────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PageError {
    BadRequest(String),
    Upstream(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PageError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            PageError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };
        (status, message).into_response()
    }
}

// ── Router ────────────────────────────────────────────────────────────

pub fn page_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(home))
        .route("/products", post(create_product))
        .route("/products/new", get(new_product))
        .route("/products/dismiss", get(dismiss_editor))
        .route("/products/{id}", post(update_product))
        .route("/products/{id}/edit", get(edit_product))
        .route("/signin", get(signin_page).post(signin))
        .route("/signout", get(signout))
        .route("/health", get(health_check))
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Run the session gate; anonymous visitors get the sign-in redirect.
fn require_session(state: &AppState, jar: &CookieJar) -> Result<Session, Response> {
    state
        .session
        .authenticate(jar)
        .map_err(IntoResponse::into_response)
}

/// Turn a finished submission into a page: back to the list on success,
/// the same editor with feedback otherwise.
fn submission_response(
    session: &Session,
    editor: &ProductEditor,
    result: Result<(), SubmitError>,
) -> Response {
    let (status, errors, notice) = match result {
        Ok(()) => return Redirect::to("/").into_response(),
        Err(SubmitError::Invalid(errors)) => (StatusCode::UNPROCESSABLE_ENTITY, errors, EditorNotice::None),
        Err(SubmitError::Persistence(_)) => (
            StatusCode::BAD_GATEWAY,
            editor.errors().clone(),
            EditorNotice::SaveFailed,
        ),
        Err(SubmitError::NotIdle) => (StatusCode::CONFLICT, editor.errors().clone(), EditorNotice::None),
    };
    let page = pages::editor(session, editor.mode(), editor.form(), &errors, notice);
    (status, page).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn health_check() -> &'static str {
    "ok"
}

async fn home(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<HomeParams>,
) -> Result<Response, PageError> {
    let session = match require_session(&state, &jar) {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };
    let action = params.action()?;
    debug!(?action, user = %session.user_name, "Rendering home page");

    let list = ListController::new(Arc::clone(&state.source));
    match action {
        HomeAction::LoadAll => list.load_all().await,
        HomeAction::Search(term) => list.search(&term).await,
        HomeAction::OrderBy(field) => list.order_by(field).await,
        HomeAction::Filter(filter) => list.filter(filter).await,
        HomeAction::Clear => list.clear_filters().await,
    };

    Ok(pages::home(&session, &list.snapshot()).into_response())
}

async fn new_product(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let session = match require_session(&state, &jar) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let editor = ProductEditor::create();
    pages::editor(&session, editor.mode(), editor.form(), editor.errors(), EditorNotice::None)
        .into_response()
}

async fn create_product(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<ProductForm>,
) -> Response {
    let session = match require_session(&state, &jar) {
        Ok(session) => session,
        Err(redirect) => return redirect,
    };
    let mut editor = ProductEditor::create();
    editor.set_form(form);
    let result = editor
        .submit(state.repository.as_ref(), &session.user_name)
        .await
        .map(|_| ());
    submission_response(&session, &editor, result)
}

async fn edit_product(
    State(state): State<SharedState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, PageError> {
    let session = match require_session(&state, &jar) {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };
    let product = state.source.find(&id).await.map_err(|e| {
        warn!(%id, error = %e, "Failed to load product for editing");
        PageError::Upstream(format!("Failed to load product {}", id))
    })?;
    let Some(product) = product else {
        return Ok((StatusCode::NOT_FOUND, pages::not_found(&session)).into_response());
    };

    let editor = ProductEditor::edit(product);
    Ok(
        pages::editor(&session, editor.mode(), editor.form(), editor.errors(), EditorNotice::None)
            .into_response(),
    )
}

async fn update_product(
    State(state): State<SharedState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response, PageError> {
    let session = match require_session(&state, &jar) {
        Ok(session) => session,
        Err(redirect) => return Ok(redirect),
    };
    let original = state.source.find(&id).await.map_err(|e| {
        warn!(%id, error = %e, "Failed to load product for update");
        PageError::Upstream(format!("Failed to load product {}", id))
    })?;
    let Some(original) = original else {
        return Ok((StatusCode::NOT_FOUND, pages::not_found(&session)).into_response());
    };

    let mut editor = ProductEditor::edit(original);
    editor.set_form(form);
    let result = editor
        .submit(state.repository.as_ref(), &session.user_name)
        .await
        .map(|_| ());
    Ok(submission_response(&session, &editor, result))
}

async fn dismiss_editor(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<DismissParams>,
) -> Result<Response, PageError> {
    if let Err(redirect) = require_session(&state, &jar) {
        return Ok(redirect);
    }
    let reason = match params.reason.as_deref() {
        Some(raw) => raw.parse::<DismissReason>().map_err(PageError::BadRequest)?,
        None => DismissReason::CloseButton,
    };
    // Nothing was saved; the list page is shown unchanged.
    info!(?reason, "Product editor dismissed");
    Ok(Redirect::to("/").into_response())
}

async fn signin_page() -> Response {
    pages::signin(None).into_response()
}

async fn signin(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<SigninForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            pages::signin(Some("Favor informar seu nome")),
        )
            .into_response();
    }
    (state.session.sign_in(jar, name), Redirect::to("/")).into_response()
}

async fn signout(State(state): State<SharedState>, jar: CookieJar) -> Response {
    (
        state.session.sign_out(jar),
        Redirect::to(&state.session.signin_path),
    )
        .into_response()
}
