// KPI domain models - current period statistics and their trend
use super::statistics::WindowStats;
use serde::Serialize;

/// Absolute and percentage change of one statistic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variation {
    pub delta: f64,
    pub delta_pct: f64,
}

/// The single comparison rule used for every statistic and granularity.
///
/// No variation is reported when the baseline is absent, NaN or exactly zero.
pub fn variation(current: f64, previous: Option<f64>) -> Option<Variation> {
    let previous = previous.filter(|p| !p.is_nan() && *p != 0.0)?;
    let delta = current - previous;
    Some(Variation {
        delta,
        delta_pct: 100.0 * delta / previous,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiResult {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub min_delta: Option<f64>,
    pub min_delta_pct: Option<f64>,
    pub mean_delta: Option<f64>,
    pub mean_delta_pct: Option<f64>,
    pub max_delta: Option<f64>,
    pub max_delta_pct: Option<f64>,
    pub period_label: String,
}

impl KpiResult {
    pub fn new(current: WindowStats, previous: Option<WindowStats>, period_label: String) -> Self {
        let min = variation(current.min, previous.map(|p| p.min));
        let mean = variation(current.mean, previous.map(|p| p.mean));
        let max = variation(current.max, previous.map(|p| p.max));

        Self {
            min: current.min,
            mean: current.mean,
            max: current.max,
            min_delta: min.map(|v| v.delta),
            min_delta_pct: min.map(|v| v.delta_pct),
            mean_delta: mean.map(|v| v.delta),
            mean_delta_pct: mean.map(|v| v.delta_pct),
            max_delta: max.map(|v| v.delta),
            max_delta_pct: max.map(|v| v.delta_pct),
            period_label,
        }
    }

    pub fn has_comparison(&self) -> bool {
        self.min_delta.is_some() || self.mean_delta.is_some() || self.max_delta.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_known_values() {
        assert_eq!(
            variation(110.0, Some(100.0)),
            Some(Variation { delta: 10.0, delta_pct: 10.0 })
        );
        assert_eq!(
            variation(90.0, Some(100.0)),
            Some(Variation { delta: -10.0, delta_pct: -10.0 })
        );
    }

    #[test]
    fn test_variation_degenerate_baseline() {
        for current in [-3.5, 0.0, 1.0, 1e6, f64::NAN] {
            assert_eq!(variation(current, Some(0.0)), None);
            assert_eq!(variation(current, Some(-0.0)), None);
            assert_eq!(variation(current, None), None);
            assert_eq!(variation(current, Some(f64::NAN)), None);
        }
    }

    #[test]
    fn test_result_deltas_per_statistic() {
        let current = WindowStats { min: 2.0, mean: 5.0, max: 12.0 };
        let previous = WindowStats { min: 0.0, mean: 4.0, max: 10.0 };
        let result = KpiResult::new(current, Some(previous), "label".to_string());

        assert_eq!(result.min_delta, None);
        assert_eq!(result.min_delta_pct, None);
        assert_eq!(result.mean_delta, Some(1.0));
        assert_eq!(result.mean_delta_pct, Some(25.0));
        assert_eq!(result.max_delta, Some(2.0));
        assert_eq!(result.max_delta_pct, Some(20.0));
        assert!(result.has_comparison());
    }

    #[test]
    fn test_result_without_comparison() {
        let current = WindowStats { min: 1.0, mean: 3.0, max: 5.0 };
        let result = KpiResult::new(current, None, "01/08/2025".to_string());
        assert!(!result.has_comparison());
        assert_eq!(result.mean_delta_pct, None);
    }
}
