//! Selection of driven adapters behind the HTTP state.
//!
//! A configured database URL selects the Diesel adapters after migrations
//! have run. Without one every port is served by a shared [`MemoryStore`].

use std::sync::Arc;

use recipe_backend::inbound::http::state::{DrivenAdapters, HttpState, HttpStatePorts};
use recipe_backend::outbound::images::FsImageStore;
use recipe_backend::outbound::memory::MemoryStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselIngredientCatalog, DieselMembershipRepository, DieselRecipeRepository,
    DieselSubscriptionRepository, DieselUserDirectory, PoolConfig, run_migrations,
};
use tracing::{info, warn};

use super::{ServerSettings, StartupError};

fn diesel_ports(pool: &DbPool, images: Arc<FsImageStore>, public_base_url: &str) -> HttpStatePorts {
    DrivenAdapters {
        catalog: Arc::new(DieselIngredientCatalog::new(pool.clone())),
        recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        memberships: Arc::new(DieselMembershipRepository::new(pool.clone())),
        subscriptions: Arc::new(DieselSubscriptionRepository::new(pool.clone())),
        users: Arc::new(DieselUserDirectory::new(pool.clone())),
        images,
    }
    .into_ports(public_base_url)
}

fn memory_ports(images: Arc<FsImageStore>, public_base_url: &str) -> HttpStatePorts {
    let store = Arc::new(MemoryStore::new());
    DrivenAdapters {
        catalog: store.clone(),
        recipes: store.clone(),
        memberships: store.clone(),
        subscriptions: store.clone(),
        users: store,
        images,
    }
    .into_ports(public_base_url)
}

/// Build the shared HTTP state from `settings`.
///
/// # Errors
///
/// Fails when the settings are inconsistent, migrations cannot be applied or
/// the connection pool cannot be created.
pub(super) async fn build_http_state(settings: &ServerSettings) -> Result<HttpState, StartupError> {
    let pages = settings.page_policy()?;
    let images = Arc::new(FsImageStore::new(settings.media_root(), settings.media_url()));
    let public_base_url = settings.public_base_url();
    let ports = match settings.database_url.as_deref() {
        Some(url) => {
            run_migrations(url).await?;
            let pool = DbPool::new(PoolConfig::new(url)).await?;
            info!("using PostgreSQL persistence");
            diesel_ports(&pool, images, public_base_url)
        }
        None => {
            warn!("no database configured; state is kept in memory and lost on exit");
            memory_ports(images, public_base_url)
        }
    };
    Ok(HttpState::new(ports, pages))
}
