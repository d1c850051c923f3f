//! Application builder.
//!
//! Every long-lived component (storage handles, the profile cache, the view
//! counter) is constructed here and owned by [`Application`]; nothing is
//! held in process-wide statics.

use axum::{routing::get, Router};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sightline_config::{AppConfig, StorageBackend};
use sightline_core::{Clock, HealthCheck, Profile, ProfileId, SightlineError, SightlineResult};
use sightline_repository::{
    create_pool, DatabasePool, InMemoryProfileRepository, InMemoryViewEventRepository,
    MySqlProfileRepository, MySqlViewEventRepository, ProfileRepository, ViewEventRepository,
};
use sightline_rest::{create_router, AppState};
use sightline_service::{ProfileCache, ProfileLookupServiceImpl, ViewCounter};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Storage handles for the selected backend.
struct Storage {
    profiles: Arc<dyn ProfileRepository>,
    ledger: Arc<dyn ViewEventRepository>,
    health: Arc<dyn HealthCheck>,
    pool: Option<Arc<DatabasePool>>,
}

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
    clock: Option<Arc<dyn Clock>>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self {
            config: None,
            clock: None,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the clock used to timestamp views.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Connects storage and wires the service graph.
    pub async fn build(self) -> SightlineResult<Application> {
        let config = self.config.unwrap_or_default();

        let storage = build_storage(&config).await?;

        let cache = Arc::new(ProfileCache::from_config(&config.cache));
        let mut views = ViewCounter::from_config(storage.ledger.clone(), &config.views);
        if let Some(clock) = self.clock {
            views = views.with_clock(clock);
        }
        info!(
            "View accounting: {}s dedup window, serialized={}",
            config.views.dedup_window_secs,
            views.is_serialized()
        );

        let service = Arc::new(ProfileLookupServiceImpl::new(
            storage.profiles.clone(),
            cache.clone(),
            Arc::new(views),
        ));

        let state = AppState::new(service).with_health_check(storage.health.clone());

        Ok(Application {
            config,
            state,
            cache,
            profiles: storage.profiles,
            pool: storage.pool,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn build_storage(config: &AppConfig) -> SightlineResult<Storage> {
    info!("Storage backend: {}", config.storage.backend);

    match config.storage.backend {
        StorageBackend::Memory => {
            let seeded = config
                .storage
                .seed_profiles
                .iter()
                .map(|raw| {
                    ProfileId::parse(raw).map(Profile::new).map_err(|e| {
                        SightlineError::Configuration(format!("Invalid seed profile '{}': {}", raw, e))
                    })
                })
                .collect::<SightlineResult<Vec<_>>>()?;
            if !seeded.is_empty() {
                info!("Seeding {} profiles into the memory store", seeded.len());
            }

            let profiles = Arc::new(InMemoryProfileRepository::with_profiles(seeded));
            Ok(Storage {
                profiles: profiles.clone(),
                ledger: Arc::new(InMemoryViewEventRepository::new()),
                health: profiles,
                pool: None,
            })
        }
        StorageBackend::Mysql => {
            let pool = create_pool(&config.storage.database).await?;
            if config.storage.database.run_migrations {
                pool.run_migrations().await?;
            }

            Ok(Storage {
                profiles: Arc::new(MySqlProfileRepository::new(pool.clone())),
                ledger: Arc::new(MySqlViewEventRepository::new(pool.clone())),
                health: pool.clone(),
                pool: Some(pool),
            })
        }
    }
}

/// A fully wired application.
pub struct Application {
    config: AppConfig,
    state: AppState,
    cache: Arc<ProfileCache>,
    profiles: Arc<dyn ProfileRepository>,
    pool: Option<Arc<DatabasePool>>,
}

impl Application {
    /// Returns the configuration the application was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the profile cache.
    pub fn cache(&self) -> &Arc<ProfileCache> {
        &self.cache
    }

    /// Returns the profile store.
    pub fn profiles(&self) -> &Arc<dyn ProfileRepository> {
        &self.profiles
    }

    /// Builds the HTTP router.
    pub fn router(&self) -> Router {
        self.router_with(Router::new())
    }

    /// Builds the HTTP router with `extra_routes` behind the same middleware.
    pub fn router_with(&self, extra_routes: Router) -> Router {
        create_router(self.state.clone(), &self.config.server, extra_routes)
    }

    /// Starts a background task that sweeps expired cache entries.
    ///
    /// Returns `None` when the cache is disabled.
    pub fn spawn_cache_sweeper(&self) -> Option<JoinHandle<()>> {
        if !self.cache.is_enabled() {
            return None;
        }
        Some(spawn_cache_sweeper(self.cache.clone(), self.cache.ttl()))
    }

    /// Releases storage resources.
    pub async fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

/// Periodically drops expired entries from `cache`.
pub fn spawn_cache_sweeper(cache: Arc<ProfileCache>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            let purged = cache.purge_expired();
            if purged > 0 {
                debug!("Purged {} expired profile cache entries", purged);
            }
        }
    })
}

/// Installs the global Prometheus recorder.
pub fn install_metrics_recorder() -> SightlineResult<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| SightlineError::Internal(format!("Failed to install metrics recorder: {}", e)))?;
    sightline_service::metrics::register_metrics();
    Ok(handle)
}

/// Router serving the Prometheus exposition at `path`.
pub fn metrics_router(path: &str, handle: PrometheusHandle) -> Router {
    Router::new().route(path, get(move || std::future::ready(handle.render())))
}
