//! Configuration types for evaluation
//!
//! Level 4 - Utilities and configuration

/// Configuration for population fitness evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Games each individual plays per generation
    pub games_per_individual: usize,
    /// Whether to evaluate individuals on the rayon pool
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            games_per_individual: 5,
            parallel: true,
        }
    }
}

impl EvalConfig {
    /// Create config with the given number of games per individual
    pub fn new(games_per_individual: usize) -> Self {
        Self {
            games_per_individual,
            ..Default::default()
        }
    }

    /// Run evaluation on the calling thread
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_config_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.games_per_individual, 5);
        assert!(config.parallel);
    }

    #[test]
    fn test_eval_config_sequential() {
        let config = EvalConfig::new(8).sequential();
        assert_eq!(config.games_per_individual, 8);
        assert!(!config.parallel);
    }
}
