//! Application state shared across API handlers

use std::sync::Arc;

use dex::{Deployment, DevnetDex};
use dex_core::AppConfig;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A provisioned pool together with its deployment record
#[derive(Debug)]
pub struct Devnet {
    pub dex: DevnetDex,
    pub deployment: Deployment,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    devnet: RwLock<Devnet>,
}

impl AppState {
    /// Wrap an already provisioned devnet
    pub fn new(config: AppConfig, dex: DevnetDex, deployment: Deployment) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                devnet: RwLock::new(Devnet { dex, deployment }),
            }),
        }
    }

    /// Provision a devnet from `config` and wrap it
    pub fn provision(config: AppConfig) -> dex_core::Result<Self> {
        let (dex, deployment) = dex::provision(&config)?;
        Ok(Self::new(config, dex, deployment))
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Read access for views and quotes
    pub async fn devnet(&self) -> RwLockReadGuard<'_, Devnet> {
        self.inner.devnet.read().await
    }

    /// Exclusive access for state-changing calls; held for the whole call so
    /// pool operations never interleave.
    pub async fn devnet_mut(&self) -> RwLockWriteGuard<'_, Devnet> {
        self.inner.devnet.write().await
    }
}
