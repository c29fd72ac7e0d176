//! BOOSTER mode
//!
//! Registered so the mode resolves to a strategy; it draws nothing yet.

use tracing::debug;

use crate::error::HudError;
use crate::strategy::{HudStrategy, RenderState};

#[derive(Debug, Default, Clone, Copy)]
pub struct BoosterHud;

impl HudStrategy for BoosterHud {
    fn name(&self) -> &'static str {
        "booster"
    }

    fn init(&mut self, state: &RenderState<'_>) -> Result<(), HudError> {
        debug!(radius = state.config().booster.radius, "booster hud ready");
        Ok(())
    }
}
