//! Render strategy module
//!
//! Forward and deferred full-frame algorithms, their configuration, and the
//! factory that picks one by name, render level or platform.

mod config;
mod deferred;
mod factory;
mod forward;
mod geometry_buffer;
mod render_strategy;

pub use config::{PlatformDescriptor, ShaderLibrary, StrategyConfig, GEOMETRY_BUFFER_ATTACHMENTS};
pub use deferred::DeferredStrategy;
pub use factory::{
    default_best_fit, BestFitHeuristic, RenderStrategyFactory,
    DEFERRED_STRATEGY_NAME, FORWARD_STRATEGY_NAME,
};
pub use forward::ForwardStrategy;
pub use geometry_buffer::{GBufferAttachment, GeometryBuffer};
pub use render_strategy::{FrameStats, RenderStrategy, StrategyKind};
