/// Summary of the fitness values measured in one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitnessStats {
    /// The lowest fitness.
    pub min: f64,
    /// The highest fitness.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The population standard deviation.
    pub std_dev: f64,
}

impl FitnessStats {
    /// Computes statistics over `values`.
    ///
    /// Returns `None` if `values` is empty.
    ///
    /// ```
    /// # use robby_training::stats::FitnessStats;
    /// let stats = FitnessStats::new([0.2, 0.4, 0.6]).unwrap();
    /// assert_eq!(stats.min, 0.2);
    /// assert_eq!(stats.max, 0.6);
    /// assert!((stats.mean - 0.4).abs() < 1e-12);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(FitnessStats::new(std::iter::empty()), None);
    }

    #[test]
    fn test_single_value() {
        let stats = FitnessStats::new([0.5]).unwrap();
        assert_eq!(stats.min, 0.5);
        assert_eq!(stats.max, 0.5);
        assert_eq!(stats.mean, 0.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_std_dev() {
        let stats = FitnessStats::new([0.0, 1.0, 0.0, 1.0]).unwrap();
        assert!((stats.mean - 0.5).abs() < 1e-12);
        assert!((stats.std_dev - 0.5).abs() < 1e-12);
    }
}
