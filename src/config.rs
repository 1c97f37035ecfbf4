use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::optimize::{Optimizer, DEFAULT_EPSILON};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Remove duplicate and collinear vertices from resolved geometries.
    pub optimize: bool,
    /// Simplification tolerance in degrees.
    pub simplify_epsilon: f64,
    /// Worker threads for the parallel pass; rayon's default if unset.
    pub threads: Option<usize>,
    /// Skip untagged ways that are already drawn as part of a multipolygon.
    pub suppress_multipolygon_members: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            optimize: true,
            simplify_epsilon: DEFAULT_EPSILON,
            threads: None,
            suppress_multipolygon_members: true,
        }
    }
}

impl ResolverConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn optimizer(&self) -> Optimizer {
        Optimizer {
            enabled: self.optimize,
            epsilon: self.simplify_epsilon,
        }
    }

    /// Sizes the global rayon pool. Call once, before the first parallel pass.
    pub fn init_thread_pool(&self) -> Result<()> {
        if let Some(threads) = self.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config: ResolverConfig = serde_json::from_str(r#"{ "threads": 2 }"#).unwrap();
        assert_eq!(config.threads, Some(2));
        assert!(config.optimize);
        assert!(config.suppress_multipolygon_members);
        assert_eq!(config.simplify_epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn optimizer_follows_config() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "optimize": false, "simplify_epsilon": 0.5 }"#).unwrap();
        assert_eq!(
            config.optimizer(),
            Optimizer {
                enabled: false,
                epsilon: 0.5
            }
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let err = serde_json::from_str::<ResolverConfig>("{ optimize: yes }");
        assert!(err.is_err());
    }
}
