//! Storefront REST API client.

use std::sync::Arc;

use grocer_core::{
    CartItem, CartLineRequest, CatalogQuery, CatalogView, NewProduct, Product, ProductId,
    StatusResponse,
};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use crate::error::{ClientError, ErrorBody};

/// Default API base used when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

/// Storefront API client.
///
/// Cheaply cloneable; clones share the connection pool.
#[derive(Clone)]
pub struct StorefrontApi {
    inner: Arc<StorefrontApiInner>,
}

struct StorefrontApiInner {
    client: reqwest::Client,
    /// Base URL without trailing slash, e.g. `http://host:8000/api`.
    base: String,
}

impl StorefrontApi {
    /// Create a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)?;
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(StorefrontApiInner {
                client,
                base: parsed.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        Ok(Url::parse(&format!("{}/{path}", self.inner.base))?)
    }

    /// All products in catalog order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.inner.client.get(self.url("products")?).send().await?;
        decode(response).await
    }

    /// Products whose name, brand or category contains `q`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn search(&self, q: &str) -> Result<Vec<Product>, ClientError> {
        let mut url = self.url("products/search")?;
        url.query_pairs_mut().append_pair("q", q);
        let response = self.inner.client.get(url).send().await?;
        decode(response).await
    }

    /// Products in exactly `category`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>, ClientError> {
        let url = self.url(&format!(
            "products/category/{}",
            urlencoding::encode(category)
        ))?;
        let response = self.inner.client.get(url).send().await?;
        decode(response).await
    }

    /// Server-computed catalog view.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn view(&self, query: &CatalogQuery) -> Result<CatalogView, ClientError> {
        let mut url = self.url("products/view")?;
        url.query_pairs_mut()
            .append_pair("search", &query.search)
            .append_pair("category", &query.category)
            .append_pair("sort", query.sort.as_str())
            .append_pair("page", &query.page.to_string());
        let response = self.inner.client.get(url).send().await?;
        decode(response).await
    }

    /// Distinct categories, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        let response = self
            .inner
            .client
            .get(self.url("products/categories")?)
            .send()
            .await?;
        decode(response).await
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self, product), fields(product_name = %product.product_name))]
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("products")?)
            .json(product)
            .send()
            .await?;
        decode(response).await
    }

    /// Current cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Vec<CartItem>, ClientError> {
        let response = self.inner.client.get(self.url("cart")?).send().await?;
        decode(response).await
    }

    /// Increase a line by `line.quantity`; returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the line.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, line: &CartLineRequest) -> Result<Vec<CartItem>, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("cart")?)
            .json(line)
            .send()
            .await?;
        decode(response).await
    }

    /// Set a line to exactly `line.quantity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the line does not exist.
    #[instrument(skip(self))]
    pub async fn update_cart(&self, line: &CartLineRequest) -> Result<StatusResponse, ClientError> {
        let response = self
            .inner
            .client
            .put(self.url("cart")?)
            .json(line)
            .send()
            .await?;
        decode(response).await
    }

    /// Remove a line; absent lines are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(
        &self,
        product_id: &ProductId,
    ) -> Result<StatusResponse, ClientError> {
        let url = self.url(&format!(
            "cart/{}",
            urlencoding::encode(product_id.as_str())
        ))?;
        let response = self.inner.client.delete(url).send().await?;
        decode(response).await
    }

    /// Ask the shopping assistant.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the assistant is unavailable.
    #[instrument(skip(self, message))]
    pub async fn chat(&self, message: &str) -> Result<String, ClientError> {
        let response = self
            .inner
            .client
            .post(self.url("chat")?)
            .json(&ChatRequest { message })
            .send()
            .await?;
        decode::<ChatReply>(response).await.map(|r| r.reply)
    }
}

/// Check the status and decode a JSON body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.detail);
        tracing::debug!(status = status.as_u16(), %detail, "API request failed");
        return Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| ClientError::Decode(format!("Failed to parse response: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_removed() {
        let api = StorefrontApi::new("http://localhost:8000/api/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000/api");
        assert_eq!(
            api.url("cart").unwrap().as_str(),
            "http://localhost:8000/api/cart"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            StorefrontApi::new("not a url"),
            Err(ClientError::Url(_))
        ));
    }

    #[test]
    fn test_path_segments_are_encoded() {
        let api = StorefrontApi::new(DEFAULT_API_URL).unwrap();
        let url = api
            .url(&format!(
                "products/category/{}",
                urlencoding::encode("Beauty & Hygiene")
            ))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/products/category/Beauty%20%26%20Hygiene"
        );
    }
}
