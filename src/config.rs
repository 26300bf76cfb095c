use serde::{Deserialize, Serialize};

/// Switches that change what an expression may contain.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    /// Recognize calls such as `abs(...)`.
    pub allow_functions: bool,
    /// Accept decimal literals and keep fractional results instead of
    /// truncating them toward zero.
    pub allow_floats: bool,
}

impl RollConfig {
    pub fn with_functions(mut self, allow: bool) -> Self {
        self.allow_functions = allow;
        self
    }

    pub fn with_floats(mut self, allow: bool) -> Self {
        self.allow_floats = allow;
        self
    }
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            allow_functions: true,
            allow_floats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RollConfig::default();
        assert!(config.allow_functions);
        assert!(!config.allow_floats);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: RollConfig = serde_json::from_str(r#"{ "allow_floats": true }"#).unwrap();
        assert_eq!(config, RollConfig::default().with_floats(true));

        let config: RollConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RollConfig::default());
    }

    #[test]
    fn test_serialize() {
        let config = RollConfig::default().with_functions(false);
        let json = serde_json::to_value(config).unwrap();
        assert_eq!(json, serde_json::json!({ "allow_functions": false, "allow_floats": false }));
    }
}
