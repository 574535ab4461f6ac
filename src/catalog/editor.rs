//! Product editor: the create/edit form for a single product.
//!
//! ```text
//!   open ──> Idle ──submit(valid)──> Submitting ──ok──> Closed(Success)
//!             │  ^                        │
//!             │  └──────persist failed────┘
//!             └──dismiss──> Closed(Cancelled)
//! ```
//!
//! Validation runs before anything is sent; an invalid form never leaves
//! `Idle`. A persistence failure returns the editor to `Idle` with the
//! user's input intact so the submission can be retried.

use std::fmt;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use uuid::Uuid;

use super::client::ProductRepository;
use super::models::{Product, format_date};
use crate::errors::SubmitError;

const MIN_TEXT_LEN: usize = 3;

/// Whether the editor creates a new product or edits an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMode {
    Create,
    Edit(Product),
}

impl EditorMode {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Create => "Adicionar Produto",
            Self::Edit(_) => "Editar Produto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Sku,
    Price,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Price => "price",
        }
    }
}

/// A single field validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    NameRequired,
    NameTooShort,
    SkuRequired,
    SkuTooShort,
    PriceRequired,
    PriceInvalid,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            Self::NameRequired | Self::NameTooShort => Field::Name,
            Self::SkuRequired | Self::SkuTooShort => Field::Sku,
            Self::PriceRequired | Self::PriceInvalid => Field::Price,
        }
    }

    /// User-facing message, pt-BR.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NameRequired => "Favor informar o nome do produto",
            Self::NameTooShort => "Nome muito curto",
            Self::SkuRequired => "Favor informar o SKU do produto",
            Self::SkuTooShort => "SKU muito curto",
            Self::PriceRequired => "Favor informar o preço do produto",
            Self::PriceInvalid => "Preço inválido",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field().as_str(), self.message())
    }
}

/// At most one error per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn for_field(&self, field: Field) -> Option<FieldError> {
        self.0.iter().copied().find(|e| e.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl From<Vec<FieldError>> for FieldErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: String,
}

/// Form input that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub name: String,
    pub sku: String,
    pub price: f64,
}

impl ProductForm {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price.to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidProduct, FieldErrors> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if let Some(e) = check_text(name, FieldError::NameRequired, FieldError::NameTooShort) {
            errors.push(e);
        }

        let sku = self.sku.trim();
        if let Some(e) = check_text(sku, FieldError::SkuRequired, FieldError::SkuTooShort) {
            errors.push(e);
        }

        let price = match parse_price(&self.price) {
            Ok(price) => Some(price),
            Err(e) => {
                errors.push(e);
                None
            }
        };

        match price {
            Some(price) if errors.is_empty() => Ok(ValidProduct {
                name: name.to_string(),
                sku: sku.to_string(),
                price,
            }),
            _ => Err(FieldErrors(errors)),
        }
    }
}

fn check_text(value: &str, required: FieldError, too_short: FieldError) -> Option<FieldError> {
    if value.is_empty() {
        Some(required)
    } else if value.chars().count() < MIN_TEXT_LEN {
        Some(too_short)
    } else {
        None
    }
}

/// Accepts `.` or `,` as the decimal separator.
fn parse_price(raw: &str) -> Result<f64, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::PriceRequired);
    }
    let price: f64 = raw.replace(',', ".").parse().map_err(|_| FieldError::PriceInvalid)?;
    if !price.is_finite() || price <= 0.0 {
        return Err(FieldError::PriceInvalid);
    }
    Ok(price)
}

/// How the user closed the editor without saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    EscapeKey,
    OutsideClick,
    CloseButton,
}

impl std::str::FromStr for DismissReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "escape" => Ok(Self::EscapeKey),
            "outside" => Ok(Self::OutsideClick),
            "close" => Ok(Self::CloseButton),
            _ => Err(format!("Invalid dismiss reason: {}", s)),
        }
    }
}

/// Signal handed back to whoever opened the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum CloseSignal {
    Success(Product),
    Cancelled,
}

impl CloseSignal {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
    Idle,
    Submitting,
    Closed(CloseSignal),
}

pub struct ProductEditor {
    mode: EditorMode,
    form: ProductForm,
    state: EditorState,
    errors: FieldErrors,
}

impl ProductEditor {
    pub fn open(mode: EditorMode) -> Self {
        let form = match &mode {
            EditorMode::Create => ProductForm::default(),
            EditorMode::Edit(product) => ProductForm::from_product(product),
        };
        Self {
            mode,
            form,
            state: EditorState::Idle,
            errors: FieldErrors::default(),
        }
    }

    pub fn create() -> Self {
        Self::open(EditorMode::Create)
    }

    pub fn edit(product: Product) -> Self {
        Self::open(EditorMode::Edit(product))
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    /// Errors from the last rejected submission.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn set_form(&mut self, form: ProductForm) {
        if self.state == EditorState::Idle {
            self.form = form;
        }
    }

    /// Close without saving. Unsaved input is discarded.
    pub fn dismiss(&mut self, reason: DismissReason) -> CloseSignal {
        if let EditorState::Closed(signal) = &self.state {
            return signal.clone();
        }
        info!(?reason, "Product editor dismissed");
        self.form = ProductForm::default();
        self.state = EditorState::Closed(CloseSignal::Cancelled);
        CloseSignal::Cancelled
    }

    pub async fn submit<R>(&mut self, repository: &R, actor: &str) -> Result<Product, SubmitError>
    where
        R: ProductRepository + ?Sized,
    {
        self.submit_on(repository, actor, Local::now().date_naive())
            .await
    }

    /// Submit with an explicit "today".
    pub async fn submit_on<R>(
        &mut self,
        repository: &R,
        actor: &str,
        today: NaiveDate,
    ) -> Result<Product, SubmitError>
    where
        R: ProductRepository + ?Sized,
    {
        if self.state != EditorState::Idle {
            return Err(SubmitError::NotIdle);
        }

        let valid = match self.form.validate() {
            Ok(valid) => valid,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors = FieldErrors::default();
        self.state = EditorState::Submitting;

        let date = format_date(today);
        let (product, result) = match &self.mode {
            EditorMode::Create => {
                let product = Product {
                    id: Uuid::new_v4().to_string(),
                    name: valid.name,
                    sku: valid.sku,
                    price: valid.price,
                    is_favorite: false,
                    created_at: date.clone(),
                    updated_at: date,
                    updated_by: actor.to_string(),
                    image: None,
                };
                let result = repository.register(&product).await;
                (product, result)
            }
            EditorMode::Edit(original) => {
                let product = Product {
                    id: original.id.clone(),
                    name: valid.name,
                    sku: valid.sku,
                    price: valid.price,
                    is_favorite: original.is_favorite,
                    created_at: original.created_at.clone(),
                    updated_at: date,
                    updated_by: actor.to_string(),
                    image: original.image.clone(),
                };
                let result = repository.update(&product.id, &product).await;
                (product, result)
            }
        };

        match result {
            Ok(()) => {
                info!(id = %product.id, mode = self.mode.title(), "Product saved");
                self.state = EditorState::Closed(CloseSignal::Success(product.clone()));
                Ok(product)
            }
            Err(e) => {
                warn!(id = %product.id, error = %e, "Failed to save product; editor stays open");
                self.state = EditorState::Idle;
                Err(SubmitError::Persistence(e))
            }
        }
    }
}
