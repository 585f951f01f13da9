use crate::core::config::WeightStrategy;

/// Turns a list of word occurrences into centroid weights: the rarer the
/// word, the more it contributes.
pub fn weights_for_occurrences(
    occurrences: &[u64],
    strategy: WeightStrategy,
    linear_factor: f32,
) -> Vec<f32> {
    match strategy {
        WeightStrategy::Log => log_weights(occurrences),
        WeightStrategy::Linear => linear_weights(occurrences, linear_factor),
    }
}

/// `w(o) = 2 * (1.05 - ln(o)/ln(max))`. The 1.05 keeps a small positive
/// weight (0.1) on the most common word instead of erasing it.
fn log_weights(occurrences: &[u64]) -> Vec<f32> {
    let max = occurrences.iter().copied().max().unwrap_or(0);
    let ln_max = (max.max(1) as f64).ln();

    occurrences
        .iter()
        .map(|&occurrence| {
            let ratio = if ln_max == 0.0 {
                // all occurrences are 1, nothing to spread
                1.0
            } else {
                (occurrence.max(1) as f64).ln() / ln_max
            };
            (2.0 * (1.05 - ratio)) as f32
        })
        .collect()
}

/// `w(o) = 1 - ((o - min)/(max - min)) * factor` with `factor` in `[0, 1]`.
/// A factor of 0 leaves every word at weight 1.
fn linear_weights(occurrences: &[u64], factor: f32) -> Vec<f32> {
    let max = occurrences.iter().copied().max().unwrap_or(0);
    let min = occurrences.iter().copied().min().unwrap_or(0);

    occurrences
        .iter()
        .map(|&occurrence| {
            if max == min {
                return 1.0;
            }
            1.0 - ((occurrence - min) as f32 / (max - min) as f32) * factor
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_weights_spread_by_rarity() {
        let weights = weights_for_occurrences(&[20000, 100], WeightStrategy::Log, 0.0);

        // the most common word keeps the minimum weight 2*(1.05-1)
        assert!((weights[0] - 0.1).abs() < 1e-6);
        // the rarer word weighs more
        assert!(weights[1] > weights[0]);
        assert!(weights[1] < 2.1);
    }

    #[test]
    fn log_weights_degenerate_to_the_floor_when_equal() {
        let weights = weights_for_occurrences(&[100, 100, 100], WeightStrategy::Log, 0.0);
        for weight in weights {
            assert!((weight - 0.1).abs() < 1e-6);
        }
    }

    #[test]
    fn linear_factor_zero_means_equal_weights() {
        let weights = weights_for_occurrences(&[20000, 100], WeightStrategy::Linear, 0.0);
        assert_eq!(weights, vec![1.0, 1.0]);
    }

    #[test]
    fn linear_factor_one_erases_the_most_common_word() {
        let weights = weights_for_occurrences(&[20000, 100], WeightStrategy::Linear, 1.0);
        assert_eq!(weights[0], 0.0);
        assert_eq!(weights[1], 1.0);
    }

    #[test]
    fn linear_half_factor_interpolates() {
        let weights = weights_for_occurrences(&[20000, 100], WeightStrategy::Linear, 0.5);
        assert_eq!(weights[0], 0.5);
        assert_eq!(weights[1], 1.0);
    }

    #[test]
    fn equal_linear_occurrences_keep_full_weight() {
        let weights = weights_for_occurrences(&[100, 100], WeightStrategy::Linear, 1.0);
        assert_eq!(weights, vec![1.0, 1.0]);
    }
}
