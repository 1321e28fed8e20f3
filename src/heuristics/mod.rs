pub mod name_match;
pub mod roll_call;

pub use name_match::*;
pub use roll_call::*;

/// Configuration for roll-call detection
#[derive(Debug, Clone)]
pub struct RollCallConfig {
    /// Role words that introduce each declaration
    pub roles: Vec<String>,
    /// A fragment is a roll-call only with more sub-speeches than this
    pub min_count_exclusive: usize,
    /// ...and only when their mean text length is below this
    pub max_mean_len_exclusive: f64,
}

impl Default for RollCallConfig {
    fn default() -> Self {
        Self {
            roles: vec!["Poseł".to_string(), "Posłanka".to_string()],
            min_count_exclusive: 10,
            max_mean_len_exclusive: 50.0,
        }
    }
}

/// Decides whether a fragment is a roll-call of many short declarations
/// rather than one speech
pub trait RollCallPolicy {
    fn is_roll_call(&self, count: usize, mean_len: f64) -> bool;
}

/// Count and mean-length thresholds
///
/// Heuristic only: the markup carries no structural roll-call signal, so short
/// ordinary exchanges can be misclassified.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    pub min_count_exclusive: usize,
    pub max_mean_len_exclusive: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self::from(&RollCallConfig::default())
    }
}

impl From<&RollCallConfig> for ThresholdPolicy {
    fn from(config: &RollCallConfig) -> Self {
        Self {
            min_count_exclusive: config.min_count_exclusive,
            max_mean_len_exclusive: config.max_mean_len_exclusive,
        }
    }
}

impl RollCallPolicy for ThresholdPolicy {
    fn is_roll_call(&self, count: usize, mean_len: f64) -> bool {
        count > self.min_count_exclusive && mean_len < self.max_mean_len_exclusive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_boundary() {
        let policy = ThresholdPolicy::default();
        assert!(!policy.is_roll_call(10, 20.0));
        assert!(policy.is_roll_call(11, 20.0));
    }

    #[test]
    fn test_mean_length_boundary() {
        let policy = ThresholdPolicy::default();
        assert!(policy.is_roll_call(11, 49.0));
        assert!(!policy.is_roll_call(11, 50.0));
    }

    #[test]
    fn test_overridden_thresholds() {
        let config = RollCallConfig {
            min_count_exclusive: 2,
            max_mean_len_exclusive: 100.0,
            ..Default::default()
        };
        let policy = ThresholdPolicy::from(&config);
        assert!(policy.is_roll_call(3, 80.0));
        assert!(!policy.is_roll_call(2, 80.0));
    }
}
