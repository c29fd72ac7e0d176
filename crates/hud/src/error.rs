//! HUD error types

use contracts::{ContractError, HudMode};
use thiserror::Error;

/// Render stage, used to label failures and timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Content,
    Overlay,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Overlay => "overlay",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render context and strategy errors
#[derive(Debug, Error)]
pub enum HudError {
    /// `set_timestamp` without a sample array
    #[error("no sample array attached")]
    NoSampleArray,

    /// A stage that needs data ran without a current sample
    #[error("no current sample")]
    NoCurrentSample,

    /// Strategy `init` hook failed
    #[error("failed to initialise '{mode}' strategy: {source}")]
    StrategyInit {
        mode: HudMode,
        #[source]
        source: Box<HudError>,
    },

    /// A render stage failed; remaining stages were skipped
    #[error("{stage} stage failed: {source}")]
    RenderStage {
        stage: Stage,
        #[source]
        source: Box<HudError>,
    },

    /// Lookup, toolkit or canvas error
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl HudError {
    pub fn strategy_init(mode: HudMode, source: HudError) -> Self {
        Self::StrategyInit {
            mode,
            source: Box::new(source),
        }
    }

    pub fn render_stage(stage: Stage, source: HudError) -> Self {
        Self::RenderStage {
            stage,
            source: Box::new(source),
        }
    }
}
