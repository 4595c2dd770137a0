//! Optimizer configuration: user options overlaid on fixed defaults.

use toml::{Table, Value};

/// Merged optimizer options.
///
/// Built only through [`OptimizeConfig::merged`], so every default key is
/// always present. Keys are opaque here; the optimizer interprets them.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizeConfig(Table);

impl OptimizeConfig {
    /// The fixed default mapping.
    pub fn defaults() -> Table {
        let mut table = Table::new();
        table.insert("dpi".into(), Value::Float(96.0));
        table.insert("expand_viewbox".into(), Value::Boolean(true));
        table.insert("coordinates_precision".into(), Value::Integer(8));
        table.insert("transforms_precision".into(), Value::Integer(8));
        table.insert("use_single_quote".into(), Value::Boolean(false));
        table.insert("indent".into(), Value::Integer(0));
        table.insert("id_prefix".into(), Value::String(String::new()));
        table
    }

    /// Overlay `user` onto the defaults; user keys win.
    ///
    /// The overlay is shallow: a user table value replaces the default
    /// value for that key as a whole.
    pub fn merged(user: &Table) -> Self {
        let mut table = Self::defaults();
        for (key, value) in user {
            table.insert(key.clone(), value.clone());
        }
        Self(table)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn table(&self) -> &Table {
        &self.0
    }
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self(Self::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_present() {
        let config = OptimizeConfig::default();
        assert_eq!(config.table(), &OptimizeConfig::defaults());
        assert_eq!(config.get("dpi"), Some(&Value::Float(96.0)));
    }

    #[test]
    fn test_user_keys_win() {
        let user: Table = toml::from_str("dpi = 300.0\nmultipass = true").unwrap();
        let config = OptimizeConfig::merged(&user);

        assert_eq!(config.get("dpi"), Some(&Value::Float(300.0)));
        assert_eq!(config.get("multipass"), Some(&Value::Boolean(true)));
        // Untouched defaults survive
        assert_eq!(config.get("indent"), Some(&Value::Integer(0)));
        assert_eq!(config.table().len(), OptimizeConfig::defaults().len() + 1);
    }

    #[test]
    fn test_merge_empty_user() {
        assert_eq!(OptimizeConfig::merged(&Table::new()), OptimizeConfig::default());
    }
}
