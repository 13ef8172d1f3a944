// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_gateway;
pub mod panel_store;
pub mod proxy;
pub mod upstream;
