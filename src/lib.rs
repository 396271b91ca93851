pub mod api;
pub mod cache;
pub mod commands;
pub mod format;
pub mod http;
pub mod notify;
pub mod page;
pub mod runtime;
