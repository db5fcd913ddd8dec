use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::checkout::error::CheckoutError;
use crate::request::client::CommerceClient;
use crate::request::executor::{RequestExecutor, RequestState};
use crate::request::graphql::{GraphQlRequest, GraphQlResponse, quote};

pub const FEATURED_COUNT: u32 = 4;
pub const FEATURED_SEARCH: &str = "Polo Shirt";

/// Everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped in a slug.
const SLUG_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default)]
    pub alt: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// Storefront link for the product page, `/products/{slug}` with the
    /// slug component-encoded.
    pub fn link(&self) -> String {
        format!("/products/{}", utf8_percent_encode(&self.slug, SLUG_ENCODE_SET))
    }

    pub fn first_image_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ProductEdge {
    node: Product,
}

#[derive(Debug, Clone, Deserialize)]
struct ProductConnection {
    #[serde(default)]
    edges: Vec<ProductEdge>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProductsData {
    products: ProductConnection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeaturedView {
    Loading,
    Unavailable,
    Products(Vec<Product>),
    Empty,
}

impl FeaturedView {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            FeaturedView::Loading => Some("Loading..."),
            FeaturedView::Unavailable => Some("No products available"),
            FeaturedView::Empty => Some("Sorry no featured products today"),
            FeaturedView::Products(_) => None,
        }
    }
}

pub fn featured_products_query(first: u32, search: &str) -> String {
    format!(
        r#"query {{
  products(first: {} filter: {{ search: {} }}) {{
    edges {{
      node {{
        id
        name
        slug
        description
        images {{
          alt
          url
        }}
      }}
      cursor
    }}
  }}
}}"#,
        first,
        quote(search)
    )
}

/// Home-page featured products, fetched once through its own executor.
pub struct FeaturedProducts {
    executor: RequestExecutor<Value>,
}

impl FeaturedProducts {
    pub fn new() -> Self {
        Self {
            executor: RequestExecutor::new(),
        }
    }

    pub fn load(&mut self, client: &dyn CommerceClient) -> Result<FeaturedView, CheckoutError> {
        let request = GraphQlRequest::new(featured_products_query(FEATURED_COUNT, FEATURED_SEARCH));
        self.executor.run(|| client.post(&request))?;
        Ok(self.view())
    }

    pub fn view(&self) -> FeaturedView {
        match self.executor.state() {
            RequestState::Idle | RequestState::Pending => FeaturedView::Loading,
            RequestState::Rejected(e) => {
                error!(error = %e, "There was an error");
                FeaturedView::Unavailable
            }
            RequestState::Resolved(body) => {
                let parsed = GraphQlResponse::<ProductsData>::from_value(body.clone(), "featured products");
                match parsed {
                    Ok(GraphQlResponse { data: Some(data), .. }) if !data.products.edges.is_empty() => {
                        info!(count = data.products.edges.len(), "featured products loaded");
                        FeaturedView::Products(data.products.edges.into_iter().map(|e| e.node).collect())
                    }
                    _ => FeaturedView::Empty,
                }
            }
        }
    }
}

impl Default for FeaturedProducts {
    fn default() -> Self {
        Self::new()
    }
}
