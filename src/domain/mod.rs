// Domain layer - panel configuration, canonical samples, runtime state
pub mod panel;
pub mod runtime;
pub mod sample;
