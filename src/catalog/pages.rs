//! HTML rendering for the catalog pages.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::editor::{EditorMode, Field, FieldErrors, ProductForm};
use super::list::ListState;
use super::models::{FilterField, Product, ProductQuery, SortField};
use super::session::Session;

const APP_TITLE: &str = "Vitrine";

// Escape leaves the editor through the same route as the close button.
const DISMISS_SCRIPT: &str = r#"
document.addEventListener("keydown", function (e) {
  if (e.key === "Escape") { window.location.href = "/products/dismiss?reason=escape"; }
});
"#;

fn layout(title: &str, session: Option<&Session>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (APP_TITLE) " | " (title) }
            }
            body {
                header {
                    a href="/" { strong { (APP_TITLE) } }
                    @if let Some(session) = session {
                        span class="user" { "Olá, " (session.user_name) }
                        " "
                        a href="/signout" { "Sair" }
                    }
                }
                main { (body) }
            }
        }
    }
}

/// Home page: filter controls plus the product grid.
pub fn home(session: &Session, list: &ListState) -> Markup {
    let active = list.active_query.as_ref();
    layout(
        "Home",
        Some(session),
        html! {
            @if list.is_loading {
                div class="loader" { "Carregando..." }
            }
            aside class="filters" {
                h3 { "Buscar:" }
                form method="get" action="/" class="searchbar" {
                    input type="search" name="q" placeholder="Buscar produto" value=(list.search_term);
                    button type="submit" { "Buscar" }
                }

                h3 { "Ordenar por:" }
                ul class="options" {
                    @for field in [SortField::Price, SortField::Name] {
                        li {
                            a href={ "/?sort=" (field.as_str()) }
                              class=[is_sorted_by(active, field).then_some("active")] {
                                (field.label())
                            }
                        }
                    }
                }

                h3 { "Filtros:" }
                ul class="options" {
                    li {
                        a href={ "/?filter=" (FilterField::Favorite.as_str()) } {
                            (FilterField::Favorite.label())
                        }
                    }
                }

                a href="/?clear=1" class="button" { "Limpar filtros" }
            }

            section class="products" {
                a href="/products/new" class="button primary" { "Adicionar Produto" }
                @if list.products.is_empty() {
                    p class="empty" { "Nenhum produto encontrado." }
                }
                @for product in &list.products {
                    (product_card(product))
                }
            }
        },
    )
}

fn is_sorted_by(active: Option<&ProductQuery>, field: SortField) -> bool {
    matches!(active, Some(ProductQuery::SortedBy(f)) if *f == field)
}

/// Path of a product's page; the id is encoded as a single path segment.
fn product_path(id: &str) -> String {
    format!("/products/{}", urlencoding::encode(id))
}

fn product_card(product: &Product) -> Markup {
    html! {
        article class="product-card" data-id=(product.id) {
            @if let Some(image) = &product.image {
                img src=(image) alt=(product.name);
            }
            h4 { (product.name) }
            p class="sku" { "SKU: " (product.sku) }
            p class="price" { (product.display_price()) }
            @if product.is_favorite {
                span class="favorite" title="Favorito" { "★" }
            }
            a href={ (product_path(&product.id)) "/edit" } { "Editar" }
        }
    }
}

/// What the editor page should say about the last submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorNotice {
    None,
    SaveFailed,
}

/// Editor modal over a backdrop; clicking the backdrop dismisses it.
pub fn editor(
    session: &Session,
    mode: &EditorMode,
    form: &ProductForm,
    errors: &FieldErrors,
    notice: EditorNotice,
) -> Markup {
    let action = match mode {
        EditorMode::Create => "/products".to_string(),
        EditorMode::Edit(product) => product_path(&product.id),
    };
    layout(
        mode.title(),
        Some(session),
        html! {
            a class="backdrop" href="/products/dismiss?reason=outside" aria-label="Fechar" {}
            div class="modal" role="dialog" {
                div class="close-area" {
                    a href="/products/dismiss?reason=close" title="Fechar" { "×" }
                }
                form method="post" action=(action) {
                    h2 { (mode.title()) }
                    @if notice == EditorNotice::SaveFailed {
                        p class="error" role="alert" {
                            "Não foi possível salvar o produto. Tente novamente."
                        }
                    }
                    (text_field(Field::Name, "Nome", "Nome do produto", "text", &form.name, errors))
                    (text_field(Field::Sku, "SKU", "SKU do produto", "text", &form.sku, errors))
                    (text_field(Field::Price, "Preço", "Preço do produto", "text", &form.price, errors))
                    button type="submit" class="primary" { (mode.title()) }
                }
            }
            script { (PreEscaped(DISMISS_SCRIPT)) }
        },
    )
}

fn text_field(
    field: Field,
    label: &str,
    placeholder: &str,
    kind: &str,
    value: &str,
    errors: &FieldErrors,
) -> Markup {
    let name = field.as_str();
    html! {
        label for=(name) { (label) }
        input id=(name) type=(kind) name=(name) placeholder=(placeholder) value=(value);
        @if let Some(error) = errors.for_field(field) {
            span class="validation-error" { (error.message()) }
        }
    }
}

pub fn signin(error: Option<&str>) -> Markup {
    layout(
        "Entrar",
        None,
        html! {
            form method="post" action="/signin" class="signin" {
                h2 { "Entrar" }
                label for="name" { "Nome" }
                input id="name" type="text" name="name" placeholder="Seu nome";
                @if let Some(error) = error {
                    span class="validation-error" { (error) }
                }
                button type="submit" class="primary" { "Entrar" }
            }
        },
    )
}

pub fn not_found(session: &Session) -> Markup {
    layout(
        "Não encontrado",
        Some(session),
        html! {
            h2 { "Produto não encontrado" }
            a href="/" { "Voltar" }
        },
    )
}
