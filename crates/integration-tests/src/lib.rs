//! Integration tests for Grocer.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p grocer-integration-tests
//! ```
//!
//! Each test starts its own storefront on an ephemeral port, so tests run in
//! parallel without shared state.
//!
//! # Test Categories
//!
//! - `catalog_api` - Product endpoints over HTTP
//! - `cart_sync` - Cart synchronizer against a live server
//! - `chat_proxy` - Chat endpoint against a mock model upstream

use std::net::SocketAddr;

use axum::Router;
use grocer_client::StorefrontApi;
use grocer_storefront::catalog::CatalogStore;
use grocer_storefront::config::StorefrontConfig;
use grocer_storefront::routes;
use grocer_storefront::state::AppState;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Boxed error for harness setup.
pub type HarnessError = Box<dyn std::error::Error + Send + Sync>;

/// Catalog header in the column order the loader expects.
pub const CSV_HEADER: &str =
    "productName,brand,price,discountPrice,imageUrl,quantity,category,subCategory,absoluteUrl";

/// A small catalog covering quoting, sorting and a non-numeric price.
pub const SAMPLE_CSV: &str = "productName,brand,price,discountPrice,imageUrl,quantity,category,subCategory,absoluteUrl
Basmati Rice,India Gate,200,180,https://img/1.jpg,1 kg,Foodgrains,Rice,https://shop/1
\"Salt, Iodised\",Tata,25,24,https://img/2.jpg,1 kg,Foodgrains,Salt,https://shop/2
Toned Milk,Amul,60,60,https://img/3.jpg,1 l,\"Bakery, Cakes & Dairy\",Milk,https://shop/3
Brown Rice,Organic Tattva,150,120,https://img/4.jpg,1 kg,Foodgrains,Rice,https://shop/4
Seasonal Mango,Fresho,N/A,N/A,https://img/5.jpg,1 kg,Fruits & Vegetables,Fruits,https://shop/5
";

/// Serve `router` on an ephemeral local port.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub async fn spawn_router(router: Router) -> Result<(SocketAddr, JoinHandle<()>), HarnessError> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, handle))
}

/// A storefront running in the test process.
pub struct TestServer {
    pub addr: SocketAddr,
    pub api: StorefrontApi,
    pub catalog: CatalogStore,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a storefront with default configuration and `csv` as catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be started.
    pub async fn start(csv: &str) -> Result<Self, HarnessError> {
        Self::with_config(&StorefrontConfig::default(), csv).await
    }

    /// Start a storefront with `config` and `csv` as catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot be started.
    pub async fn with_config(config: &StorefrontConfig, csv: &str) -> Result<Self, HarnessError> {
        let catalog = CatalogStore::new();
        catalog.load_from_str(csv);

        let state = AppState::new(config, catalog.clone())?;
        let (addr, handle) = spawn_router(routes::app(state)).await?;
        let api = StorefrontApi::new(&format!("http://{addr}/api"))?;

        Ok(Self {
            addr,
            api,
            catalog,
            handle,
        })
    }

    /// URL of a path on this server, e.g. `/health`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
