//! HUD strategy seam
//!
//! A strategy draws one HUD mode. The render context owns the data source and
//! hands strategies a read-only `RenderState`.

use std::collections::HashMap;

use contracts::{Canvas, HudMode, ReplayConfig, Sample};

use crate::booster::BoosterHud;
use crate::error::HudError;
use crate::swingboat::SwingboatHud;

/// Where the current sample comes from
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DataSource {
    /// Nothing resolved yet
    #[default]
    None,
    /// Index into the sample array, resolved from a playback timestamp
    Array { index: usize, time_us: u64 },
    /// A sample pushed by the caller (live data)
    External(Sample),
}

/// State visible to strategies
#[derive(Debug, Clone)]
pub struct RenderState<'a> {
    config: &'a ReplayConfig,
    samples: &'a [Sample],
    source: DataSource,
}

impl<'a> RenderState<'a> {
    pub(crate) fn new(config: &'a ReplayConfig, samples: &'a [Sample]) -> Self {
        Self {
            config,
            samples,
            source: DataSource::None,
        }
    }

    pub(crate) fn set_source(&mut self, source: DataSource) {
        self.source = source;
    }

    pub fn config(&self) -> &'a ReplayConfig {
        self.config
    }

    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// The resolved sample, if any
    pub fn current_sample(&self) -> Option<&Sample> {
        match &self.source {
            DataSource::None => None,
            DataSource::Array { index, .. } => self.samples.get(*index),
            DataSource::External(sample) => Some(sample),
        }
    }

    /// Array index of the current sample, `None` unless the source is the array
    pub fn current_index(&self) -> Option<usize> {
        match self.source {
            DataSource::Array { index, .. } => Some(index),
            _ => None,
        }
    }

    /// Graphics density scale (dpi / 160)
    pub fn density(&self) -> f64 {
        self.config.display.dp2px(1.0)
    }

    /// Text density scale (spi / 160)
    pub fn text_density(&self) -> f64 {
        self.config.display.sp2px(1.0)
    }

    pub fn dp2px(&self, dp: f64) -> f64 {
        self.config.display.dp2px(dp)
    }

    pub fn sp2px(&self, sp: f64) -> f64 {
        self.config.display.sp2px(sp)
    }
}

/// One HUD mode
///
/// Every hook defaults to a successful no-op.
pub trait HudStrategy {
    fn name(&self) -> &'static str;

    /// Precompute per-sample state; runs once when the context is created
    fn init(&mut self, _state: &RenderState<'_>) -> Result<(), HudError> {
        Ok(())
    }

    fn render_content(
        &self,
        _state: &RenderState<'_>,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), HudError> {
        Ok(())
    }

    fn render_overlay(
        &self,
        _state: &RenderState<'_>,
        _canvas: &mut dyn Canvas,
    ) -> Result<(), HudError> {
        Ok(())
    }
}

pub type StrategyFactory = fn() -> Box<dyn HudStrategy>;

/// Mode tag to strategy constructor
///
/// Modes without an entry get no strategy, so rendering only clears.
pub struct StrategyRegistry {
    factories: HashMap<HudMode, StrategyFactory>,
}

impl StrategyRegistry {
    /// Registry without any strategy
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn register(&mut self, mode: HudMode, factory: StrategyFactory) -> &mut Self {
        self.factories.insert(mode, factory);
        self
    }

    pub fn create(&self, mode: HudMode) -> Option<Box<dyn HudStrategy>> {
        self.factories.get(&mode).map(|factory| factory())
    }

    pub fn contains(&self, mode: HudMode) -> bool {
        self.factories.contains_key(&mode)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(HudMode::Booster, booster)
            .register(HudMode::Swingboat, swingboat);
        registry
    }
}

fn booster() -> Box<dyn HudStrategy> {
    Box::new(BoosterHud)
}

fn swingboat() -> Box<dyn HudStrategy> {
    Box::new(SwingboatHud::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = StrategyRegistry::default();
        assert!(registry.create(HudMode::Normal).is_none(), "normal has no strategy");
        assert_eq!(registry.create(HudMode::Booster).unwrap().name(), "booster");
        assert_eq!(registry.create(HudMode::Swingboat).unwrap().name(), "swingboat");
    }

    #[test]
    fn test_current_sample_by_source() {
        let config = ReplayConfig::default();
        let samples = [
            Sample {
                time: 10,
                ..Default::default()
            },
            Sample {
                time: 20,
                ..Default::default()
            },
        ];
        let mut state = RenderState::new(&config, &samples);
        assert!(state.current_sample().is_none());

        state.set_source(DataSource::Array {
            index: 1,
            time_us: 15,
        });
        assert_eq!(state.current_sample().map(|s| s.time), Some(20));
        assert_eq!(state.current_index(), Some(1));

        state.set_source(DataSource::External(Sample {
            time: 99,
            ..Default::default()
        }));
        assert_eq!(state.current_sample().map(|s| s.time), Some(99));
        assert_eq!(state.current_index(), None);
    }
}
