//! Render context
//!
//! Resolves the current sample from either a playback timestamp (array source)
//! or a pushed live sample (external source), then drives the active strategy.

use std::sync::Arc;
use std::time::Instant;

use contracts::{with_saved, Canvas, ReplayConfig, Sample};
use timeline::find_index_for_time;
use tracing::{debug, instrument, warn};

use crate::error::{HudError, Stage};
use crate::metrics::RenderMetrics;
use crate::strategy::{DataSource, HudStrategy, RenderState, StrategyRegistry};

/// Render context state machine
///
/// Starts with no source; `set_timestamp` and `push_sample` switch between
/// the array and external sources in any order.
pub struct RenderContext<'a> {
    state: RenderState<'a>,
    strategy: Option<Box<dyn HudStrategy>>,
    metrics: Arc<RenderMetrics>,
}

impl<'a> RenderContext<'a> {
    /// Context with the default strategy registry
    ///
    /// # Errors
    /// - The selected strategy's `init` fails
    pub fn new(config: &'a ReplayConfig, samples: &'a [Sample]) -> Result<Self, HudError> {
        Self::with_registry(config, samples, &StrategyRegistry::default())
    }

    #[instrument(
        name = "render_context_init",
        skip_all,
        fields(mode = %config.hud.mode, samples = samples.len())
    )]
    pub fn with_registry(
        config: &'a ReplayConfig,
        samples: &'a [Sample],
        registry: &StrategyRegistry,
    ) -> Result<Self, HudError> {
        let state = RenderState::new(config, samples);
        let mode = config.hud.mode;

        let mut strategy = registry.create(mode);
        match strategy.as_mut() {
            Some(strategy) => {
                strategy
                    .init(&state)
                    .map_err(|e| HudError::strategy_init(mode, e))?;
                debug!(strategy = strategy.name(), "strategy initialised");
            }
            None => debug!("no strategy for mode, rendering clears only"),
        }

        Ok(Self {
            state,
            strategy,
            metrics: Arc::new(RenderMetrics::new()),
        })
    }

    /// Share counters with another context or a reporter
    pub fn with_metrics(mut self, metrics: Arc<RenderMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<RenderMetrics> {
        &self.metrics
    }

    pub fn state(&self) -> &RenderState<'a> {
        &self.state
    }

    pub fn strategy_name(&self) -> Option<&'static str> {
        self.strategy.as_ref().map(|s| s.name())
    }

    /// Resolve the current sample from a playback position
    ///
    /// Scanning resumes from the previous array index while time moves
    /// forward and restarts from the beginning otherwise. Returns the
    /// resolved index.
    ///
    /// # Errors
    /// - No samples are attached
    /// - `us` is at or past the last sample
    pub fn set_timestamp(&mut self, us: u64) -> Result<usize, HudError> {
        let samples = self.state.samples();
        if samples.is_empty() {
            return Err(HudError::NoSampleArray);
        }

        let hint = match *self.state.source() {
            DataSource::Array { index, time_us } if us >= time_us => index,
            _ => 0,
        };
        let index = find_index_for_time(samples, hint, us)?;
        self.state.set_source(DataSource::Array { index, time_us: us });
        Ok(index)
    }

    /// Make `sample` the current sample
    pub fn push_sample(&mut self, sample: Sample) {
        self.state.set_source(DataSource::External(sample));
    }

    pub fn current_sample(&self) -> Option<&Sample> {
        self.state.current_sample()
    }

    /// Clear the canvas, then draw content and overlay if a sample is current
    ///
    /// A failing stage skips the rest. Each stage runs inside its own
    /// save/restore pair, so the canvas stack is balanced on every exit.
    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<(), HudError> {
        canvas.clear();

        if self.state.current_sample().is_none() {
            self.metrics.inc_frames_empty();
            return Ok(());
        }
        let Some(strategy) = self.strategy.as_deref() else {
            self.metrics.inc_frames_rendered();
            return Ok(());
        };

        self.run_stage(Stage::Content, canvas, |state, canvas| {
            strategy.render_content(state, canvas)
        })?;
        self.run_stage(Stage::Overlay, canvas, |state, canvas| {
            strategy.render_overlay(state, canvas)
        })?;

        self.metrics.inc_frames_rendered();
        Ok(())
    }

    fn run_stage<F>(&self, stage: Stage, canvas: &mut dyn Canvas, draw: F) -> Result<(), HudError>
    where
        F: FnOnce(&RenderState<'a>, &mut dyn Canvas) -> Result<(), HudError>,
    {
        let started = Instant::now();
        let result = with_saved(canvas, |canvas| draw(&self.state, canvas));
        self.metrics.record_stage_time(stage, started.elapsed());

        result.map_err(|e| {
            warn!(%stage, error = %e, "render stage failed");
            self.metrics.record_failure(stage);
            HudError::render_stage(stage, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use contracts::{ContractError, HudMode};
    use std::cell::Cell;

    fn samples(n: u64) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample {
                time: i * 1000,
                quat: [1.0, 0.0, 0.0, 0.0],
                ..Default::default()
            })
            .collect()
    }

    thread_local! {
        static INIT_CALLS: Cell<usize> = const { Cell::new(0) };
    }

    /// Draws one marker per stage; fails where configured
    struct Probe {
        fail_content: bool,
    }

    impl HudStrategy for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn init(&mut self, _state: &RenderState<'_>) -> Result<(), HudError> {
            INIT_CALLS.with(|c| c.set(c.get() + 1));
            Ok(())
        }

        fn render_content(
            &self,
            _state: &RenderState<'_>,
            canvas: &mut dyn Canvas,
        ) -> Result<(), HudError> {
            canvas.translate(1.0, 0.0);
            if self.fail_content {
                return Err(ContractError::canvas("content exploded").into());
            }
            Ok(())
        }

        fn render_overlay(
            &self,
            _state: &RenderState<'_>,
            canvas: &mut dyn Canvas,
        ) -> Result<(), HudError> {
            canvas.translate(2.0, 0.0);
            Ok(())
        }
    }

    fn probe() -> Box<dyn HudStrategy> {
        Box::new(Probe {
            fail_content: false,
        })
    }

    fn failing_probe() -> Box<dyn HudStrategy> {
        Box::new(Probe { fail_content: true })
    }

    /// Rejects every recording at `init`
    struct Unready;

    impl HudStrategy for Unready {
        fn name(&self) -> &'static str {
            "unready"
        }

        fn init(&mut self, _state: &RenderState<'_>) -> Result<(), HudError> {
            Err(ContractError::invalid_argument("samples", "no gondola geometry").into())
        }

        fn render_content(
            &self,
            _state: &RenderState<'_>,
            _canvas: &mut dyn Canvas,
        ) -> Result<(), HudError> {
            unreachable!("never initialised")
        }

        fn render_overlay(
            &self,
            _state: &RenderState<'_>,
            _canvas: &mut dyn Canvas,
        ) -> Result<(), HudError> {
            unreachable!("never initialised")
        }
    }

    fn registry(factory: fn() -> Box<dyn HudStrategy>) -> StrategyRegistry {
        let mut registry = StrategyRegistry::empty();
        registry.register(HudMode::Booster, factory);
        registry
    }

    fn booster_config() -> ReplayConfig {
        let mut config = ReplayConfig::default();
        config.hud.mode = HudMode::Booster;
        config
    }

    fn translations(canvas: &RecordingCanvas) -> Vec<f64> {
        canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Translate { dx, .. } => Some(*dx),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state_is_none() {
        let config = ReplayConfig::default();
        let data = samples(5);
        let ctx = RenderContext::new(&config, &data).unwrap();
        assert!(ctx.current_sample().is_none());
        assert_eq!(ctx.state().source(), &DataSource::None);
    }

    #[test]
    fn test_set_timestamp_without_samples() {
        let config = ReplayConfig::default();
        let mut ctx = RenderContext::new(&config, &[]).unwrap();
        assert!(matches!(ctx.set_timestamp(0), Err(HudError::NoSampleArray)));
    }

    #[test]
    fn test_set_timestamp_resolves_next_sample() {
        let config = ReplayConfig::default();
        let data = samples(10);
        let mut ctx = RenderContext::new(&config, &data).unwrap();

        assert_eq!(ctx.set_timestamp(2500).unwrap(), 3);
        assert_eq!(ctx.current_sample().unwrap().time, 3000);

        // forward uses the hint, backward rescans
        assert_eq!(ctx.set_timestamp(7000).unwrap(), 8);
        assert_eq!(ctx.set_timestamp(100).unwrap(), 1);

        assert!(matches!(
            ctx.set_timestamp(9000),
            Err(HudError::Contract(ContractError::LookupOutOfRange { .. }))
        ));
        assert_eq!(ctx.current_sample().unwrap().time, 1000, "failed lookup keeps state");
    }

    #[test]
    fn test_push_sample_and_back_to_array() {
        let config = ReplayConfig::default();
        let data = samples(10);
        let mut ctx = RenderContext::new(&config, &data).unwrap();

        ctx.set_timestamp(4500).unwrap();
        let live = Sample {
            time: 123_456,
            pressure: 950.0,
            ..Default::default()
        };
        ctx.push_sample(live);
        assert_eq!(ctx.current_sample(), Some(&live));

        // external source never seeds the hint
        assert_eq!(ctx.set_timestamp(500).unwrap(), 1);
    }

    #[test]
    fn test_render_without_sample_only_clears() {
        let config = booster_config();
        let data = samples(3);
        let ctx = RenderContext::with_registry(&config, &data, &registry(probe)).unwrap();

        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        ctx.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops(), &[DrawOp::Clear]);
        assert_eq!(ctx.metrics().snapshot().frames_empty, 1);
    }

    #[test]
    fn test_render_runs_content_then_overlay() {
        let config = booster_config();
        let data = samples(3);
        let mut ctx = RenderContext::with_registry(&config, &data, &registry(probe)).unwrap();
        ctx.set_timestamp(500).unwrap();

        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        ctx.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops()[0], DrawOp::Clear);
        assert_eq!(translations(&canvas), vec![1.0, 2.0], "content before overlay");
        assert_eq!(canvas.depth(), 0, "stack balanced");
    }

    #[test]
    fn test_failing_content_skips_overlay() {
        let config = booster_config();
        let data = samples(3);
        let mut ctx =
            RenderContext::with_registry(&config, &data, &registry(failing_probe)).unwrap();
        ctx.push_sample(data[0]);

        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        let err = ctx.render(&mut canvas).unwrap_err();
        assert!(matches!(
            err,
            HudError::RenderStage {
                stage: Stage::Content,
                ..
            }
        ));
        assert_eq!(translations(&canvas), vec![1.0], "overlay never ran");
        assert_eq!(canvas.depth(), 0, "stack balanced after failure");
        assert_eq!(ctx.metrics().snapshot().failure_count, 1);
    }

    #[test]
    fn test_init_runs_once() {
        let config = booster_config();
        let data = samples(3);
        INIT_CALLS.with(|c| c.set(0));
        let ctx = RenderContext::with_registry(&config, &data, &registry(probe)).unwrap();
        assert_eq!(ctx.strategy_name(), Some("probe"));
        assert_eq!(INIT_CALLS.with(|c| c.get()), 1);
    }

    #[test]
    fn test_failing_init_aborts_construction() {
        let config = booster_config();
        let data = samples(3);
        let registry = registry(|| Box::new(Unready));

        let Err(err) = RenderContext::with_registry(&config, &data, &registry) else {
            panic!("context built despite failing init");
        };
        assert!(
            matches!(err, HudError::StrategyInit { mode: HudMode::Booster, .. }),
            "got {err:?}"
        );
        assert!(err.to_string().contains("no gondola geometry"));
    }

    #[test]
    fn test_normal_mode_has_no_strategy() {
        let config = ReplayConfig::default();
        let data = samples(3);
        let mut ctx = RenderContext::new(&config, &data).unwrap();
        ctx.set_timestamp(0).unwrap();
        assert_eq!(ctx.strategy_name(), None);

        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        ctx.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops(), &[DrawOp::Clear]);
    }
}
