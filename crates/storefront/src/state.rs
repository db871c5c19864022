//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::catalog::CatalogStore;
use crate::config::StorefrontConfig;
use crate::services::chat::{ChatClient, ChatError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the cart and the chat upstream.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: CatalogStore,
    cart: CartStore,
    chat: ChatClient,
}

impl AppState {
    /// Create a new application state with an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the chat HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig, catalog: CatalogStore) -> Result<Self, ChatError> {
        let chat = ChatClient::new(&config.chat)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                catalog,
                cart: CartStore::new(),
                chat,
            }),
        })
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogStore {
        &self.inner.catalog
    }

    /// Get a reference to the cart.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the chat client.
    #[must_use]
    pub fn chat(&self) -> &ChatClient {
        &self.inner.chat
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_chat_client_follows_configured_key() {
        let state = AppState::new(&StorefrontConfig::default(), CatalogStore::new()).unwrap();
        assert!(!state.chat().is_configured());

        let mut config = StorefrontConfig::default();
        config.chat.api_key = Some(SecretString::from("k3y"));
        let state = AppState::new(&config, CatalogStore::new()).unwrap();
        assert!(state.chat().is_configured());
        assert_eq!(state.cart().count(), 0);
    }
}
