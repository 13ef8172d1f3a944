// Application layer - polling core and panel lifecycle
pub mod collector;
pub mod metrics_gateway;
pub mod normalizer;
pub mod panel_service;
pub mod panel_store;
pub mod poller;

#[cfg(test)]
pub mod testing;
