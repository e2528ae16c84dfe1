pub mod bootstrap;
pub mod config;
pub mod dom;
pub mod http_client;
pub mod loader;
pub mod page;
pub mod project;
pub mod skills;
