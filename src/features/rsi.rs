//! RSI with Wilder's smoothing over a full close series

use crate::error::ConfigError;

/// Compute an RSI series index-aligned with `closes`.
///
/// Index `i` is defined once `period` closes precede it (`i >= period`):
/// the first value is seeded from the mean gain/loss of the first `period`
/// deltas, later values use Wilder's smoothing. Earlier indices are `None`.
/// A flat window yields 50 and a window without losses yields 100.
pub fn compute_rsi(closes: &[f64], period: usize) -> Result<Vec<Option<f64>>, ConfigError> {
    if period < 2 {
        return Err(ConfigError::InvalidPeriod(period));
    }

    let mut series = vec![None; closes.len()];
    if closes.len() <= period {
        tracing::debug!(
            close_count = closes.len(),
            period,
            "RSI: Not enough closes"
        );
        return Ok(series);
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for i in 1..=period {
        let (gain, loss) = split_change(closes[i] - closes[i - 1]);
        gains += gain;
        losses += loss;
    }

    let n = period as f64;
    let mut avg_gain = gains / n;
    let mut avg_loss = losses / n;
    series[period] = Some(rsi_from_averages(avg_gain, avg_loss));

    for i in (period + 1)..closes.len() {
        let (gain, loss) = split_change(closes[i] - closes[i - 1]);
        avg_gain = (avg_gain * (n - 1.0) + gain) / n;
        avg_loss = (avg_loss * (n - 1.0) + loss) / n;
        series[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(series)
}

/// Last defined value of an RSI series
pub fn latest_rsi(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().find_map(|v| *v)
}

fn split_change(change: f64) -> (f64, f64) {
    if change > 0.0 {
        (change, 0.0)
    } else {
        (0.0, -change)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0; // No movement = neutral
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_period_below_two_rejected() {
        assert_eq!(
            compute_rsi(&[1.0, 2.0, 3.0], 1),
            Err(ConfigError::InvalidPeriod(1))
        );
        assert_eq!(compute_rsi(&[], 0), Err(ConfigError::InvalidPeriod(0)));
    }

    #[test]
    fn test_huge_period_all_absent() {
        let rsi = compute_rsi(&[1.0, 2.0, 3.0], usize::MAX).unwrap();
        assert_eq!(rsi, vec![None, None, None]);
    }

    #[test]
    fn test_short_series_all_absent() {
        for len in 0..=14 {
            let closes: Vec<f64> = (0..len).map(|i| 100.0 + i as f64).collect();
            let rsi = compute_rsi(&closes, 14).unwrap();
            assert_eq!(rsi.len(), len);
            assert!(rsi.iter().all(Option::is_none), "len {len}");
        }
    }

    #[test]
    fn test_first_defined_index_is_period() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 3) as f64).collect();
        let rsi = compute_rsi(&closes, 5).unwrap();
        assert!(rsi[..5].iter().all(Option::is_none));
        assert!(rsi[5..].iter().all(Option::is_some));
    }

    #[test]
    fn test_flat_series_is_neutral() {
        let closes = vec![250.0; 30];
        let rsi = compute_rsi(&closes, 14).unwrap();
        for value in rsi[14..].iter() {
            assert_eq!(*value, Some(50.0));
        }
    }

    #[test]
    fn test_monotonic_up_is_100() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let rsi = compute_rsi(&closes, 14).unwrap();
        for value in rsi.iter().flatten() {
            assert_eq!(*value, 100.0);
        }
    }

    #[test]
    fn test_monotonic_down_is_0() {
        let closes: Vec<f64> = (0..40).map(|i| 500.0 - i as f64).collect();
        let rsi = compute_rsi(&closes, 14).unwrap();
        for value in rsi.iter().flatten() {
            assert_eq!(*value, 0.0);
        }
    }

    #[test]
    fn test_seed_and_smoothing_values() {
        // Deltas: +1, -1, +2, then +1
        let closes = [10.0, 11.0, 10.0, 12.0, 13.0];
        let rsi = compute_rsi(&closes, 3).unwrap();

        // Seed: avg_gain = 3/3 = 1, avg_loss = 1/3 -> RS = 3 -> RSI = 75
        assert_close(rsi[3].unwrap(), 75.0, 1e-9);

        // Smoothed: avg_gain = (1*2 + 1)/3 = 1, avg_loss = (1/3*2)/3 = 2/9
        // RS = 4.5 -> RSI = 100 - 100/5.5
        assert_close(rsi[4].unwrap(), 100.0 - 100.0 / 5.5, 1e-9);
    }

    #[test]
    fn test_values_stay_in_bounds() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 24_000.0 + ((i * 37) % 101) as f64 - 50.0)
            .collect();
        let rsi = compute_rsi(&closes, 14).unwrap();
        for value in rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn test_prefix_stability() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + ((i * 7) % 11) as f64)
            .collect();
        let full = compute_rsi(&closes, 14).unwrap();
        let prefix = compute_rsi(&closes[..45], 14).unwrap();
        assert_eq!(&full[..45], &prefix[..]);
    }

    #[test]
    fn test_latest_rsi() {
        assert_eq!(latest_rsi(&[None, Some(40.0), Some(55.0)]), Some(55.0));
        assert_eq!(latest_rsi(&[None, None]), None);
    }
}
