//! The package management page: filter state, the cached list query and the
//! approve/feature/delete actions.

mod actions;
pub mod form;
pub mod render;

use anyhow::Result;
use log::{debug, info, warn};
use std::time::Duration;

use crate::api::{AdminApi, CategoryFilter, Package, PackageId, PackagePage, PackageQuery};
use crate::cache::QueryCache;
use crate::notify::Notifier;

pub use actions::{Mutation, PackageAction, available_actions};

/// Default lifetime of a cached list.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

/// What the list area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Empty,
    Grid(Vec<Package>),
}

impl ListView {
    pub fn packages(&self) -> &[Package] {
        match self {
            ListView::Empty => &[],
            ListView::Grid(packages) => packages,
        }
    }

    pub fn find(&self, id: &PackageId) -> Option<&Package> {
        self.packages().iter().find(|pkg| &pkg.id == id)
    }
}

pub struct PackagesPage<A: AdminApi, N: Notifier> {
    api: A,
    notifier: N,
    cache: QueryCache<PackageQuery, PackagePage>,
    query: PackageQuery,
}

impl<A: AdminApi, N: Notifier> PackagesPage<A, N> {
    pub fn new(api: A, notifier: N, stale_after: Duration) -> Self {
        Self {
            api,
            notifier,
            cache: QueryCache::new(stale_after),
            query: PackageQuery::default(),
        }
    }

    pub fn query(&self) -> &PackageQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        debug!("Search set to {:?}", self.query.search);
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
        debug!("Category filter set to {}", category);
    }

    /// Loads the list for the current query, from cache when fresh.
    ///
    /// A failed read is logged and shown as an empty list.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> ListView {
        let page = match self.cache.get(&self.query) {
            Some(page) => {
                debug!("Using cached packages for {}", self.query);
                page
            }
            None => match self.fetch().await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to load packages for {}: {:#}", self.query, e);
                    return ListView::Empty;
                }
            },
        };

        if page.packages.is_empty() {
            ListView::Empty
        } else {
            ListView::Grid(page.packages)
        }
    }

    async fn fetch(&self) -> Result<PackagePage> {
        let ticket = self.cache.begin_fetch();
        let page = self.api.list_packages(&self.query).await?;
        self.cache.store(self.query.clone(), page.clone(), ticket);
        Ok(page)
    }

    /// Drops cached lists so the next [`load`](Self::load) hits the API.
    pub fn refresh(&self) {
        self.cache.invalidate();
    }

    /// Runs one write. On success the list cache is invalidated and a success
    /// notification shown; on failure only the generic failure message is
    /// shown and the error is handed back to the caller.
    #[tracing::instrument(skip(self))]
    pub async fn mutate(&self, mutation: Mutation, id: &PackageId) -> Result<()> {
        info!("Requesting {} of package {}", mutation, id);

        let result = match mutation {
            Mutation::Approve => self.api.approve_package(id).await,
            Mutation::Feature => self.api.feature_package(id).await,
            Mutation::Delete => self.api.delete_package(id).await,
        };

        match result {
            Ok(()) => {
                self.cache.invalidate();
                self.notifier.success(mutation.success_message());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to {} package {}: {:#}", mutation, id, e);
                self.notifier.error(mutation.failure_message());
                Err(e)
            }
        }
    }
}
