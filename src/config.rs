use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen: String,
    pub database_path: String,
    pub jwt_secret: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:5000".to_string(),
            database_path: "./chirp.sqlite3".to_string(),
            jwt_secret: None,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Path::new("config.toml");
        if config_path.exists() {
            let mut file = std::fs::File::open(config_path).expect("failed to open config.toml");
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .expect("failed to read config.toml");
            toml::from_str(&contents).expect("failed to parse config.toml")
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .expect("failed to serialize default config");
            let mut file =
                std::fs::File::create(config_path).expect("failed to create config.toml");
            file.write_all(toml_string.as_bytes())
                .expect("failed to write config.toml");
            default_config
        }
    }

    /// Load and validate. The signing secret and database path are
    /// startup requirements, never per-request errors.
    pub fn load_or_die() -> Self {
        let cfg = Self::load();
        assert!(
            !cfg.jwt_secret.as_deref().unwrap_or("").is_empty(),
            "jwt_secret must be set in config.toml"
        );
        assert!(
            !cfg.database_path.is_empty(),
            "database_path must be set in config.toml"
        );
        cfg
    }

    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret
            .as_ref()
            .expect("jwt_secret must be set")
            .as_bytes()
    }
}
