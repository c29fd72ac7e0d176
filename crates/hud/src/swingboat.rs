//! SWINGBOAT mode
//!
//! Draws a swing-ride schematic (A-frame with a gondola hanging from the
//! pivot) rotated by the ride's tilt, plus a G-force readout with a trailing
//! graph.

use std::cell::Cell;

use analysis::geometry::{angle_between, deg2rad, quat, rotate, tri_opp2adj, vec3};
use contracts::{
    with_saved, Canvas, Color, ContractError, LinearGradient, Sample, SwingboatPosition,
};
use timeline::{downscale, find_index_for_time, Bucket};
use tracing::{debug, instrument};

use crate::error::HudError;
use crate::strategy::{DataSource, HudStrategy, RenderState};

/// Pixels per schematic unit
const PPM: f64 = 40.0;

/// Downsampled series rate for the graph (buckets per second)
const GRAPH_RATE_HZ: u64 = 30;

const FRAME_HEIGHT: f64 = 11.0;
const FRAME_ANGLE: f64 = 75.0;
const FRAME_THICKNESS: f64 = 1.5;
const FRAME_COLOR: u32 = 0xffffffe5;
const FRAME_TOP_COLOR: u32 = 0x000000e5;
const GONDOLA_HEIGHT: f64 = 10.0;
const GONDOLA_ANGLE: f64 = 35.0;
const GONDOLA_FRAME_THICKNESS: f64 = 0.8;
const GONDOLA_THICKNESS: f64 = 2.0;
const GONDOLA_COLOR: u32 = 0xff8f00e5;

const GRAPH_WIDTH: f64 = 200.0;
const GRAPH_HEIGHT: f64 = 100.0;

/// Signed tilt of an orientation about the view axis (radians)
///
/// The north unit vector is rotated by `q`, projected onto the y/z plane with
/// its length kept, and measured against north; the sign follows the z
/// component.
pub fn tilt_angle(q: &[f64; 4]) -> f64 {
    let north = vec3([0.0, 1.0, 0.0]);
    let mut rotated = rotate(&quat(*q), &north);

    rotated.x = 0.0;
    rotated.y = (1.0 - rotated.z * rotated.z).max(0.0).sqrt();

    let angle = angle_between(&north, &rotated);
    if rotated.z < 0.0 {
        -angle
    } else {
        angle
    }
}

/// Horizontal offset of a leg of `height` opening at `angle` degrees from vertical
fn x_for_height_angle(height: f64, angle: f64) -> f64 {
    tri_opp2adj(height, deg2rad(180.0 - 90.0 - angle))
}

#[derive(Debug, Default)]
pub struct SwingboatHud {
    /// Tilt per sample, parallel to the sample array
    angles: Vec<f64>,
    /// Downsampled series for the graph
    lores: Vec<Bucket>,
    /// Last graph lookup as `(time_us, bucket index)`
    graph_cursor: Cell<(u64, usize)>,
}

impl SwingboatHud {
    /// Cached tilt of array sample `index`
    pub fn angle(&self, index: usize) -> Option<f64> {
        self.angles.get(index).copied()
    }

    /// Bucket the graph ends at, resuming from the previous frame's lookup
    fn graph_anchor(&self, now_us: u64) -> Option<usize> {
        let last = self.lores.len().checked_sub(1)?;
        let (prev_us, prev) = self.graph_cursor.get();
        let hint = if now_us >= prev_us { prev } else { 0 };
        let anchor = find_index_for_time(&self.lores, hint.min(last), now_us).unwrap_or(last);
        self.graph_cursor.set((now_us, anchor));
        Some(anchor)
    }

    fn current_angle(&self, state: &RenderState<'_>) -> Result<f64, HudError> {
        match state.source() {
            DataSource::Array { index, .. } => self
                .angle(*index)
                .ok_or(HudError::NoCurrentSample),
            DataSource::External(sample) => Ok(tilt_angle(&sample.quat)),
            DataSource::None => Err(HudError::NoCurrentSample),
        }
    }

    fn draw_graph(&self, state: &RenderState<'_>, canvas: &mut dyn Canvas) -> Result<(), HudError> {
        // needs the array to look back in time
        let Some(index) = state.current_index() else {
            return Ok(());
        };
        let Some(anchor) = self.graph_anchor(state.samples()[index].time) else {
            return Ok(());
        };
        let now = &self.lores[anchor];

        let graph = &state.config().graph;
        let (w, h) = (GRAPH_WIDTH, GRAPH_HEIGHT);
        let window = graph.window_us as f64;

        with_saved(canvas, |c| -> Result<(), ContractError> {
            c.rectangle(0.0, 0.0, w, h);
            c.clip()?;

            c.set_line_width(6.0);
            c.set_source(
                LinearGradient::new((0.0, h - h / graph.max_g * graph.redline_g), (0.0, h))
                    .with_stop(0.0, Color::RED)
                    .with_stop(0.5, Color::YELLOW)
                    .with_stop(1.0, Color::GREEN)
                    .into(),
            );

            let start = now.time.saturating_sub(graph.window_us);
            for i in (1..=anchor).rev() {
                let bucket = &self.lores[i];
                if bucket.time < start {
                    break;
                }
                let x = w - w / window * (now.time - bucket.time) as f64;
                let y = h - h / graph.max_g * bucket.accel_magnitude();
                if i == anchor {
                    c.move_to(x, y);
                } else {
                    c.line_to(x, y);
                }
            }
            c.stroke()
        })?;

        canvas.set_source(Color::BLACK.into());
        canvas.set_line_width(3.0);
        canvas.move_to(0.0, 0.0);
        canvas.line_to(0.0, h);
        canvas.line_to(w, h);
        canvas.stroke()?;
        Ok(())
    }
}

/// Clip to everything above `height` in user space
fn clip_bottom(canvas: &mut dyn Canvas, height: f64) -> Result<(), ContractError> {
    const FAR: f64 = 1.0e4;
    canvas.rectangle(-FAR, -FAR, 2.0 * FAR, FAR + height);
    canvas.clip()
}

/// Schematic at the pivot, in schematic units
fn draw_swingboat(canvas: &mut dyn Canvas, rotation: f64) -> Result<(), ContractError> {
    let x_frame = x_for_height_angle(FRAME_HEIGHT * 2.0, FRAME_ANGLE / 2.0);
    let x_gondola = x_for_height_angle(GONDOLA_HEIGHT, GONDOLA_ANGLE / 2.0);

    with_saved(canvas, |c| -> Result<(), ContractError> {
        c.rotate(rotation);
        c.set_source(Color::from_rgba_u32(GONDOLA_COLOR).into());

        // suspension arms
        c.set_line_width(GONDOLA_FRAME_THICKNESS);
        c.move_to(0.0, 0.0);
        c.line_to(x_gondola, GONDOLA_HEIGHT);
        c.move_to(0.0, 0.0);
        c.line_to(-x_gondola, GONDOLA_HEIGHT);
        c.stroke()?;

        // gondola
        c.set_line_width(GONDOLA_THICKNESS);
        c.arc(
            0.0,
            0.0,
            x_gondola.hypot(GONDOLA_HEIGHT) - GONDOLA_THICKNESS / 2.0,
            deg2rad(90.0 - GONDOLA_ANGLE / 2.0),
            deg2rad(90.0 + GONDOLA_ANGLE / 2.0),
        );
        c.stroke()
    })?;

    with_saved(canvas, |c| -> Result<(), ContractError> {
        clip_bottom(c, FRAME_HEIGHT)?;
        c.set_source(Color::from_rgba_u32(FRAME_COLOR).into());
        c.set_line_width(FRAME_THICKNESS);
        c.move_to(0.0, 0.0);
        c.line_to(x_frame, FRAME_HEIGHT * 2.0);
        c.move_to(0.0, 0.0);
        c.line_to(-x_frame, FRAME_HEIGHT * 2.0);
        c.stroke()
    })?;

    // pivot
    canvas.set_source(Color::from_rgba_u32(FRAME_COLOR).into());
    canvas.set_line_width(0.2);
    canvas.arc(0.0, 0.0, 1.0, 0.0, std::f64::consts::TAU);
    canvas.fill_preserve()?;
    canvas.set_source(Color::from_rgba_u32(FRAME_TOP_COLOR).into());
    canvas.stroke()
}

/// White text with a black outline, top-left at the current origin
fn draw_outlined_text(
    canvas: &mut dyn Canvas,
    text: &str,
    size: f64,
    outline: f64,
) -> Result<f64, ContractError> {
    let extents = canvas.text_extents(text, size);
    canvas.move_to(0.0, extents.height);
    canvas.text_path(text, size);
    canvas.set_source(Color::WHITE.into());
    canvas.fill_preserve()?;
    canvas.set_source(Color::BLACK.into());
    canvas.set_line_width(outline);
    canvas.stroke()?;
    Ok(extents.width)
}

impl HudStrategy for SwingboatHud {
    fn name(&self) -> &'static str {
        "swingboat"
    }

    #[instrument(name = "swingboat_init", skip_all, fields(samples = state.samples().len()))]
    fn init(&mut self, state: &RenderState<'_>) -> Result<(), HudError> {
        let samples: &[Sample] = state.samples();
        self.angles = samples.iter().map(|s| tilt_angle(&s.quat)).collect();

        if !samples.is_empty() {
            self.lores = downscale(samples, 1_000_000 / GRAPH_RATE_HZ)?;
        }
        debug!(
            angles = self.angles.len(),
            buckets = self.lores.len(),
            "swingboat state computed"
        );
        Ok(())
    }

    fn render_content(&self, state: &RenderState<'_>, canvas: &mut dyn Canvas) -> Result<(), HudError> {
        let mut rotation = self.current_angle(state)?;
        match state.config().swingboat.position {
            SwingboatPosition::Back => rotation += deg2rad(GONDOLA_ANGLE / 2.0),
            SwingboatPosition::Middle => {}
            SwingboatPosition::Front => rotation -= deg2rad(GONDOLA_ANGLE / 2.0),
        }

        let (width, height) = canvas.size();
        let density = state.density();
        with_saved(canvas, |c| {
            c.translate(width - 10.0 * PPM, height - 11.5 * PPM);
            c.scale(density, density);
            c.scale(PPM, PPM);
            draw_swingboat(c, rotation)
        })?;
        Ok(())
    }

    fn render_overlay(&self, state: &RenderState<'_>, canvas: &mut dyn Canvas) -> Result<(), HudError> {
        let sample = state.current_sample().ok_or(HudError::NoCurrentSample)?;
        let text = format!("{:.1}G", sample.accel_magnitude());
        let text_density = state.text_density();

        with_saved(canvas, |c| -> Result<(), HudError> {
            c.translate(state.dp2px(10.0), state.dp2px(10.0));
            let width = draw_outlined_text(c, &text, state.sp2px(100.0), state.dp2px(2.0))?;

            with_saved(c, |c| {
                c.translate(width, 0.0);
                c.scale(text_density, text_density);
                c.translate(10.0, 0.0);
                self.draw_graph(state, c)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use crate::RenderContext;
    use contracts::{HudMode, ReplayConfig};

    fn about_x(degrees: f64) -> [f64; 4] {
        let half = deg2rad(degrees) / 2.0;
        [half.cos(), half.sin(), 0.0, 0.0]
    }

    fn swing_config(position: SwingboatPosition) -> ReplayConfig {
        let mut config = ReplayConfig::default();
        config.hud.mode = HudMode::Swingboat;
        config.swingboat.position = position;
        config
    }

    fn series(n: u64) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample {
                time: i * 10_000,
                accel: [0.0, 0.0, 1.0 + (i % 10) as f64 * 0.1],
                quat: about_x(i as f64),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_tilt_angle_sign_and_magnitude() {
        assert!(tilt_angle(&[1.0, 0.0, 0.0, 0.0]).abs() < 1e-12);
        assert!((tilt_angle(&about_x(30.0)) - deg2rad(30.0)).abs() < 1e-9);
        assert!((tilt_angle(&about_x(-45.0)) + deg2rad(45.0)).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_ignores_rotation_about_view_axis() {
        // rotation about x keeps north inside the y/z plane; about y it stays north
        let h = deg2rad(40.0) / 2.0;
        let about_y = [h.cos(), 0.0, h.sin(), 0.0];
        assert!(tilt_angle(&about_y).abs() < 1e-9);
    }

    #[test]
    fn test_init_caches_angles_per_sample() {
        let config = swing_config(SwingboatPosition::Middle);
        let samples = series(100);
        let state = RenderState::new(&config, &samples);
        let mut hud = SwingboatHud::default();
        hud.init(&state).unwrap();

        assert_eq!(hud.angles.len(), samples.len());
        assert!((hud.angle(20).unwrap() - deg2rad(20.0)).abs() < 1e-9);
        assert_eq!(hud.lores.len(), 29, "990ms at 30Hz buckets");
    }

    #[test]
    fn test_graph_anchor_resumes_and_rewinds() {
        let config = swing_config(SwingboatPosition::Middle);
        let samples = series(500);
        let state = RenderState::new(&config, &samples);
        let mut hud = SwingboatHud::default();
        hud.init(&state).unwrap();

        let fresh = |t| find_index_for_time(&hud.lores, 0, t).unwrap();
        for t in [100_000, 1_000_000, 1_000_000, 2_500_000, 400_000, 3_000_000] {
            assert_eq!(hud.graph_anchor(t), Some(fresh(t)), "t = {t}");
            assert_eq!(hud.graph_cursor.get(), (t, fresh(t)));
        }
        // past the last bucket the graph ends there
        assert_eq!(hud.graph_anchor(60_000_000), Some(hud.lores.len() - 1));
        assert_eq!(hud.graph_anchor(200_000), Some(fresh(200_000)));
    }

    #[test]
    fn test_position_offsets_rotation() {
        let samples = series(100);
        let expected = [
            (SwingboatPosition::Back, deg2rad(10.0 + 17.5)),
            (SwingboatPosition::Middle, deg2rad(10.0)),
            (SwingboatPosition::Front, deg2rad(10.0 - 17.5)),
        ];
        for (position, angle) in expected {
            let config = swing_config(position);
            let mut ctx = RenderContext::new(&config, &samples).unwrap();
            ctx.set_timestamp(95_000).unwrap();

            let mut canvas = RecordingCanvas::new(1280.0, 720.0);
            ctx.render(&mut canvas).unwrap();
            let rotations = canvas.rotations();
            assert_eq!(rotations.len(), 1);
            assert!(
                (rotations[0] - angle).abs() < 1e-9,
                "{position:?}: {} vs {angle}",
                rotations[0]
            );
            assert_eq!(canvas.depth(), 0);
        }
    }

    #[test]
    fn test_external_sample_uses_live_angle() {
        let config = swing_config(SwingboatPosition::Middle);
        let samples = series(100);
        let mut ctx = RenderContext::new(&config, &samples).unwrap();
        ctx.push_sample(Sample {
            quat: about_x(-25.0),
            accel: [0.0, 0.0, 2.0],
            ..Default::default()
        });

        let mut canvas = RecordingCanvas::new(1280.0, 720.0);
        ctx.render(&mut canvas).unwrap();
        assert!((canvas.rotations()[0] + deg2rad(25.0)).abs() < 1e-9);

        // the graph needs the array
        let gradients = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::SetSource(contracts::Source::Linear(_))))
            .count();
        assert_eq!(gradients, 0);
        assert!(canvas.ops().contains(&DrawOp::TextPath {
            text: "2.0G".into(),
            size: config.display.sp2px(100.0),
        }));
    }

    #[test]
    fn test_graph_drawn_from_array() {
        let config = swing_config(SwingboatPosition::Back);
        let samples = series(500);
        let mut ctx = RenderContext::new(&config, &samples).unwrap();
        ctx.set_timestamp(3_000_000).unwrap();

        let mut canvas = RecordingCanvas::new(1280.0, 720.0);
        ctx.render(&mut canvas).unwrap();

        let ops = canvas.ops();
        let gradient = ops
            .iter()
            .position(|op| matches!(op, DrawOp::SetSource(contracts::Source::Linear(_))))
            .expect("graph gradient set");
        let points = ops[gradient..]
            .iter()
            .take_while(|op| **op != DrawOp::Stroke)
            .filter(|op| matches!(op, DrawOp::MoveTo { .. } | DrawOp::LineTo { .. }))
            .count();
        // anchor bucket 90 back to bucket 1: buckets within the 10s window
        assert_eq!(points, 90);
    }

    #[test]
    fn test_clip_failure_surfaces_as_stage_error() {
        let config = swing_config(SwingboatPosition::Back);
        let samples = series(100);
        let mut ctx = RenderContext::new(&config, &samples).unwrap();
        ctx.set_timestamp(0).unwrap();

        let mut canvas = RecordingCanvas::new(800.0, 600.0).failing_on(DrawOp::Clip);
        let err = ctx.render(&mut canvas).unwrap_err();
        assert!(matches!(err, HudError::RenderStage { .. }));
        assert_eq!(canvas.depth(), 0);
    }
}
