use crate::core::config::data::{Config, ConfigKey};

impl Config {
    /// Render every key with its effective value, marking defaults.
    pub fn describe(&self) -> Vec<String> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| match (self.get(key), self.default_for(key)) {
                (Some(value), _) => format!("  {}: {value}", key.as_str()),
                (None, Some(default)) => format!("  {}: {default} (default)", key.as_str()),
                (None, None) => format!("  {}: (unset)", key.as_str()),
            })
            .collect()
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        for line in self.describe() {
            println!("{line}");
        }
    }

    fn default_for(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::ApiKeyHeader => Some(self.api_key_header()),
            ConfigKey::ApiKeyEnv => Some(self.api_key_env()),
            ConfigKey::Greeting => Some(self.greeting()),
            ConfigKey::Title => Some(self.title()),
            ConfigKey::Endpoint | ConfigKey::LogFile => None,
        }
    }
}
