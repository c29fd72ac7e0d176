//! 配置校验模块
//!
//! 校验规则：
//! - 字段范围 (derive `Validate`)
//! - video.endoff >= video.startoff (endoff 设置时)
//! - 浮点字段必须有限
//! - graph.redline_g >= graph.max_g 时颜色渐变才完整，仅警告

use contracts::{ContractError, ReplayConfig};
use tracing::warn;
use validator::Validate;

/// 校验 ReplayConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &ReplayConfig) -> Result<(), ContractError> {
    validate_ranges(config)?;
    validate_video_window(config)?;
    validate_finite(config)?;
    check_graph_scale(config);
    Ok(())
}

/// derive 规则
fn validate_ranges(config: &ReplayConfig) -> Result<(), ContractError> {
    config
        .validate()
        .map_err(|e| ContractError::config_validation("config", e.to_string()))
}

/// 校验视频窗口
fn validate_video_window(config: &ReplayConfig) -> Result<(), ContractError> {
    let video = &config.video;
    if let Some(end) = video.end() {
        if end < video.startoff {
            return Err(ContractError::config_validation(
                "video.startoff / video.endoff",
                format!(
                    "endoff ({end}) must be >= startoff ({}) when set",
                    video.startoff
                ),
            ));
        }
    }
    Ok(())
}

/// 校验浮点字段
fn validate_finite(config: &ReplayConfig) -> Result<(), ContractError> {
    let q = &config.data.imu_orientation;
    let fields = [
        ("hud.altitude_ground", config.hud.altitude_ground),
        ("data.pressure_coeff", config.data.pressure_coeff),
        ("data.imu_orientation.w", q.w),
        ("data.imu_orientation.x", q.x),
        ("data.imu_orientation.y", q.y),
        ("data.imu_orientation.z", q.z),
        ("booster.radius", config.booster.radius),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ContractError::config_validation(
                field,
                format!("must be finite, got {value}"),
            ));
        }
    }
    Ok(())
}

fn check_graph_scale(config: &ReplayConfig) {
    let graph = &config.graph;
    if graph.redline_g < graph.max_g {
        warn!(
            redline_g = graph.redline_g,
            max_g = graph.max_g,
            "graph redline below max_g, gradient is clipped"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(validate(&ReplayConfig::default()).is_ok());
    }

    #[test]
    fn test_video_window_inverted() {
        let mut cfg = ReplayConfig::default();
        cfg.video.startoff = 5000;
        cfg.video.endoff = 1000;
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("endoff"));
    }

    #[test]
    fn test_unset_endoff_ignored() {
        let mut cfg = ReplayConfig::default();
        cfg.video.startoff = 5000;
        cfg.video.endoff = 0;
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut cfg = ReplayConfig::default();
        cfg.hud.altitude_ground = f64::NAN;
        let err = validate(&cfg).unwrap_err();
        assert!(matches!(err, ContractError::ConfigValidation { ref field, .. } if field == "hud.altitude_ground"));
    }

    #[test]
    fn test_zero_density_rejected() {
        let mut cfg = ReplayConfig::default();
        cfg.display.dpi = 0.0;
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_zero_graph_window_rejected() {
        let mut cfg = ReplayConfig::default();
        cfg.graph.window_us = 0;
        assert!(validate(&cfg).is_err());
    }
}
