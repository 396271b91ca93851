//! Client side of the marketplace admin API.

mod client;
mod query;
mod types;

pub use client::{AdminApi, AdminClient, DEFAULT_API_URL};
pub use query::PackageQuery;
pub use types::{
    Category, CategoryFilter, Package, PackageId, PackagePage, PackageStatus, parse_timestamp,
};

#[cfg(test)]
pub use client::MockAdminApi;
