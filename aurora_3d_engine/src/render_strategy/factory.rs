/// RenderStrategyFactory - creates strategies by registry name, by render
/// level, or from a platform description.
///
/// The registry maps names to constructors, like a plugin table. Two names
/// are registered by default: "simplePhong" (forward) and "deferredPhong"
/// (deferred). Render levels order strategies from cheapest to richest so a
/// caller can step up or down at runtime.

use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::{engine_bail, engine_err, engine_info};
use super::config::{PlatformDescriptor, ShaderLibrary, StrategyConfig};
use super::deferred::DeferredStrategy;
use super::forward::ForwardStrategy;
use super::render_strategy::RenderStrategy;

/// Registry name of the forward strategy
pub const FORWARD_STRATEGY_NAME: &str = "simplePhong";

/// Registry name of the deferred strategy
pub const DEFERRED_STRATEGY_NAME: &str = "deferredPhong";

/// Strategy constructor stored in the registry
type StrategyConstructor =
    Box<dyn Fn(&str, &StrategyConfig, &ShaderLibrary) -> Box<dyn RenderStrategy> + Send + Sync>;

/// Maps a platform to the registry name of the strategy to create
pub type BestFitHeuristic = Box<dyn Fn(&PlatformDescriptor) -> String + Send + Sync>;

/// Default heuristic: deferred unless the platform is constrained
pub fn default_best_fit(platform: &PlatformDescriptor) -> String {
    if platform.is_constrained() {
        FORWARD_STRATEGY_NAME.to_string()
    } else {
        DEFERRED_STRATEGY_NAME.to_string()
    }
}

fn create_forward(name: &str, config: &StrategyConfig, shaders: &ShaderLibrary) -> Box<dyn RenderStrategy> {
    Box::new(ForwardStrategy::new(name, config.clone(), shaders.forward.clone()))
}

fn create_deferred(name: &str, config: &StrategyConfig, shaders: &ShaderLibrary) -> Box<dyn RenderStrategy> {
    Box::new(DeferredStrategy::new(
        name,
        config.clone(),
        shaders.geometry_pass.clone(),
        shaders.resolve.clone(),
    ))
}

pub struct RenderStrategyFactory {
    constructors: FxHashMap<String, StrategyConstructor>,
    render_levels: Vec<String>,
    best_fit: BestFitHeuristic,
    config: StrategyConfig,
    shaders: ShaderLibrary,
}

impl RenderStrategyFactory {
    /// Factory with the built-in strategies, default config and shaders
    pub fn new() -> Self {
        Self::with_config(StrategyConfig::default(), ShaderLibrary::default())
    }

    /// Factory with the built-in strategies
    pub fn with_config(config: StrategyConfig, shaders: ShaderLibrary) -> Self {
        let mut constructors: FxHashMap<String, StrategyConstructor> = FxHashMap::default();
        constructors.insert(FORWARD_STRATEGY_NAME.to_string(), Box::new(create_forward));
        constructors.insert(DEFERRED_STRATEGY_NAME.to_string(), Box::new(create_deferred));
        Self {
            constructors,
            render_levels: vec![FORWARD_STRATEGY_NAME.to_string(), DEFERRED_STRATEGY_NAME.to_string()],
            best_fit: Box::new(default_best_fit),
            config,
            shaders,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn shaders(&self) -> &ShaderLibrary {
        &self.shaders
    }

    /// Registered names, sorted
    pub fn strategy_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of the render levels, cheapest first
    pub fn render_levels(&self) -> &[String] {
        &self.render_levels
    }

    // ===== REGISTRATION =====

    /// Register a custom strategy constructor
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if the name is taken.
    pub fn register_strategy<F>(&mut self, name: &str, constructor: F) -> Result<()>
    where
        F: Fn(&str, &StrategyConfig, &ShaderLibrary) -> Box<dyn RenderStrategy> + Send + Sync + 'static,
    {
        if self.constructors.contains_key(name) {
            engine_bail!(ConfigurationError, "aurora3d::RenderStrategyFactory",
                "Strategy '{}' is already registered", name);
        }
        self.constructors.insert(name.to_string(), Box::new(constructor));
        engine_info!("aurora3d::RenderStrategyFactory", "Registered strategy '{}'", name);
        Ok(())
    }

    /// Replace the render level sequence
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if a level names an unregistered strategy.
    pub fn set_render_levels(&mut self, levels: Vec<String>) -> Result<()> {
        if let Some(unknown) = levels.iter().find(|l| !self.constructors.contains_key(l.as_str())) {
            engine_bail!(ConfigurationError, "aurora3d::RenderStrategyFactory",
                "Render level '{}' is not a registered strategy", unknown);
        }
        self.render_levels = levels;
        Ok(())
    }

    /// Override the platform heuristic used by `create_best_fit`
    pub fn set_best_fit_heuristic<F>(&mut self, heuristic: F)
    where
        F: Fn(&PlatformDescriptor) -> String + Send + Sync + 'static,
    {
        self.best_fit = Box::new(heuristic);
    }

    // ===== CREATION =====

    /// Create an unbound strategy from its registry name
    ///
    /// # Errors
    ///
    /// `ConfigurationError` for unknown names.
    pub fn create_by_name(&self, name: &str) -> Result<Box<dyn RenderStrategy>> {
        let constructor = self.constructors.get(name)
            .ok_or_else(|| engine_err!(ConfigurationError, "aurora3d::RenderStrategyFactory",
                "Unknown render strategy '{}'", name))?;
        engine_info!("aurora3d::RenderStrategyFactory", "Creating strategy '{}'", name);
        Ok(constructor(name, &self.config, &self.shaders))
    }

    /// Create the strategy the heuristic picks for `platform`
    pub fn create_best_fit(&self, platform: &PlatformDescriptor) -> Result<Box<dyn RenderStrategy>> {
        let name = (self.best_fit)(platform);
        self.create_by_name(&name)
    }

    /// Strategy one render level above `current`, `None` at the top or for
    /// names outside the sequence
    pub fn create_next_render_level(&self, current: &str) -> Result<Option<Box<dyn RenderStrategy>>> {
        match self.render_levels.iter().position(|l| l == current) {
            Some(index) if index + 1 < self.render_levels.len() => {
                self.create_by_name(&self.render_levels[index + 1]).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Strategy one render level below `current`, `None` at the bottom or for
    /// names outside the sequence
    pub fn create_previous_render_level(&self, current: &str) -> Result<Option<Box<dyn RenderStrategy>>> {
        match self.render_levels.iter().position(|l| l == current) {
            Some(index) if index > 0 => {
                self.create_by_name(&self.render_levels[index - 1]).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl Default for RenderStrategyFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
