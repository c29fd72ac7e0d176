//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 解码 → 预处理 → 渲染的端到端流程
//! - 实时推送路径与配置驱动的渲染

#[cfg(test)]
mod contract_tests {
    use contracts::{HudMode, ReplayConfig, FRAME_SIZE};

    #[test]
    fn test_wire_frame_size() {
        assert_eq!(FRAME_SIZE, 136, "17 eight-byte fields");
        assert_eq!(ingestion::encode_frame(&Default::default(), 0).len(), FRAME_SIZE);
    }

    #[test]
    fn test_default_config_is_normal_mode() {
        let config = ReplayConfig::default();
        assert_eq!(config.hud.mode, HudMode::Normal);
        assert_eq!(config.video.end(), None);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::io::{self, Read, Seek};
    use std::sync::Arc;

    use analysis::{fields, Extremum, FieldView};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{HudMode, ReplayConfig, Sample};
    use hud::{tilt_angle, DrawOp, RecordingCanvas, RenderContext, SkiaCanvas};
    use ingestion::{
        load_all_fd, FrameDecoder, IngestionMetrics, Preprocessor, ReadOutcome,
        SwingSynth,
    };
    use observability::{FrameOutcome, SessionAggregator};

    fn swing_config() -> ReplayConfig {
        ConfigLoader::load_from_str(
            r#"
[hud]
mode = "swingboat"

[swingboat]
position = "back"
"#,
            ConfigFormat::Toml,
        )
        .unwrap()
    }

    /// Swing ride at 100 Hz, 10 s period, 60° amplitude
    ///
    /// The peak of the first swing is sample 250 (t = 2.5 s); a playback
    /// position just before it resolves to that sample and the gondola is
    /// drawn at 60° plus the back-seat offset.
    #[test]
    fn test_swing_scenario_peak_angle() {
        let config = swing_config();
        let samples = SwingSynth::default().samples();
        assert_eq!(samples.len(), 1000);

        let mut ctx = RenderContext::new(&config, &samples).unwrap();
        assert_eq!(ctx.strategy_name(), Some("swingboat"));

        let index = ctx.set_timestamp(2_495_000).unwrap();
        assert_eq!(index, 250, "first sample after 2.495s");

        let mut canvas = RecordingCanvas::new(1920.0, 1080.0);
        ctx.render(&mut canvas).unwrap();

        let rotations = canvas.rotations();
        assert_eq!(rotations.len(), 1, "one rotation per frame");
        let expected = (60.0f64 + 17.5).to_radians();
        assert!(
            (rotations[0] - expected).abs() < 1e-6,
            "rotation {} vs {expected}",
            rotations[0]
        );
        assert_eq!(canvas.depth(), 0, "save/restore balanced");

        // seeking backwards restarts the scan
        assert_eq!(ctx.set_timestamp(5_000).unwrap(), 1);
    }

    #[test]
    fn test_decode_preprocess_render_pipeline() {
        let synth = SwingSynth {
            seconds: 4.0,
            ..Default::default()
        };
        let mut file = tempfile::tempfile().unwrap();
        synth.write_to(&mut file).unwrap();
        file.rewind().unwrap();

        let raw = load_all_fd(&mut file).unwrap();
        assert_eq!(raw.len(), 400);

        let mut config = swing_config();
        config.video.startoff = 1_000;
        config.video.endoff = 3_000;
        let samples = Preprocessor::new(&config).process_all(raw).unwrap();
        assert_eq!(samples.first().map(|s| s.time), Some(1_000_000));
        assert_eq!(samples.last().map(|s| s.time), Some(3_000_000));

        let mut ctx = RenderContext::new(&config, &samples).unwrap();
        ctx.set_timestamp(2_000_000).unwrap();

        let mut canvas = SkiaCanvas::new(1280, 720).unwrap();
        ctx.render(&mut canvas).unwrap();

        assert_eq!(canvas.pixel(0, 0).map(|p| p[3]), Some(0), "corner stays clear");
        let painted = canvas.to_rgba().chunks(4).filter(|px| px[3] > 0).count();
        assert!(painted > 1000, "HUD drew something: {painted} pixels");
        assert_eq!(ctx.metrics().snapshot().frames_rendered, 1);
    }

    /// Reader that hands out 7-byte chunks and would block in between
    struct Dribble {
        data: Vec<u8>,
        pos: usize,
        blocked: bool,
    }

    impl Read for Dribble {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.data.len() {
                return Ok(0);
            }
            self.blocked = !self.blocked;
            if self.blocked {
                return Err(io::ErrorKind::WouldBlock.into());
            }
            let n = buf.len().min(7).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_live_push_path() {
        let config = swing_config();
        let synth = SwingSynth {
            seconds: 0.5,
            ..Default::default()
        };
        let mut data = Vec::new();
        synth.write_to(&mut data).unwrap();

        let mut reader = Dribble {
            data,
            pos: 0,
            blocked: false,
        };
        let metrics = Arc::new(IngestionMetrics::new());
        let mut decoder = FrameDecoder::new().with_metrics(metrics.clone());
        let mut pre = Preprocessor::new(&config);
        let mut ctx = RenderContext::new(&config, &[]).unwrap();
        let mut canvas = RecordingCanvas::new(1280.0, 720.0);
        let mut session = SessionAggregator::new();
        let mut last: Option<Sample> = None;

        loop {
            match decoder.decode_one(&mut reader).unwrap() {
                ReadOutcome::Sample(raw) => {
                    let Some(sample) = pre.process(raw).unwrap() else {
                        continue;
                    };
                    session.update_sample(&sample);
                    ctx.push_sample(sample);
                    canvas.take_ops();
                    ctx.render(&mut canvas).unwrap();
                    session.update_frame(FrameOutcome::Rendered, 0.0);
                    last = Some(sample);
                }
                ReadOutcome::WouldBlock => continue,
                ReadOutcome::Eof => break,
            }
        }

        let last = last.expect("samples decoded");
        assert_eq!(metrics.snapshot().frames_decoded, 50);
        assert!(metrics.snapshot().would_block > 0);
        assert_eq!(session.summary().total_frames, 50);

        // back seat offset on top of the live angle
        let expected = tilt_angle(&last.quat) + 17.5f64.to_radians();
        assert!((canvas.rotations()[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_config_to_render() {
        let json = r#"{ "hud": { "mode": "booster" }, "booster": { "radius": 7.5 } }"#;
        let config = ConfigLoader::load_from_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.hud.mode, HudMode::Booster);

        let samples = SwingSynth::default().samples();
        let mut ctx = RenderContext::new(&config, &samples).unwrap();
        assert_eq!(ctx.strategy_name(), Some("booster"));
        ctx.set_timestamp(1_000_000).unwrap();

        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        ctx.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops().first(), Some(&DrawOp::Clear));
        assert_eq!(canvas.depth(), 0);

        // NORMAL has no strategy: the frame is only cleared
        let normal = ReplayConfig::default();
        let mut ctx = RenderContext::new(&normal, &samples).unwrap();
        assert_eq!(ctx.strategy_name(), None);
        ctx.set_timestamp(1_000_000).unwrap();
        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        ctx.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops(), &[DrawOp::Clear]);
    }

    #[test]
    fn test_render_without_current_sample_only_clears() {
        let config = swing_config();
        let samples = SwingSynth::default().samples();
        let ctx = RenderContext::new(&config, &samples).unwrap();

        let mut canvas = RecordingCanvas::new(640.0, 480.0);
        ctx.render(&mut canvas).unwrap();
        assert_eq!(canvas.ops(), &[DrawOp::Clear]);
        assert_eq!(ctx.metrics().snapshot().frames_empty, 1);
    }

    #[test]
    fn test_ampd_finds_swing_bottoms_in_pressure() {
        let samples = SwingSynth {
            seconds: 20.0,
            ..Default::default()
        }
        .samples();
        let view = FieldView::new(&samples, fields::pressure).unwrap();
        let flags = analysis::ampd(&view, Extremum::Peak).unwrap();

        let peaks: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, f)| **f == 1)
            .map(|(i, _)| i)
            .collect();
        // pressure is highest at the bottom of every half swing
        assert_eq!(peaks, vec![500, 1000, 1500]);
    }

    #[test]
    fn test_lores_buckets_follow_samples() {
        let samples = SwingSynth::default().samples();
        let buckets = timeline::downscale(&samples, 1_000_000 / 30).unwrap();

        let mut hint = 0;
        for bucket in buckets.iter().take(buckets.len() - 1) {
            let index = timeline::find_index_for_time(&samples, hint, bucket.time).unwrap();
            assert!(samples[index].time > bucket.time);
            assert!(samples[index - 1].time <= bucket.time);
            hint = index;
        }
    }
}
