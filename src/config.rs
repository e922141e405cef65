use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub firebase: FirebaseSettings,
    #[serde(default)]
    pub collection: CollectionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Firebase project credentials and endpoints. The endpoints have
/// production defaults and are only overridden in tests.
#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseSettings {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_firestore_endpoint")]
    pub firestore_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_jwks_endpoint")]
    pub jwks_endpoint: String,
}

fn default_firestore_endpoint() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_token_endpoint() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_jwks_endpoint() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

/// Collection IDs in Firestore.
///
/// `test_users` is consulted for the like-target lookup while `users`
/// serves the acting subject and the profile listing; the split
/// matches the deployed data layout.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    #[serde(default = "default_users_collection")]
    pub users: String,
    #[serde(default = "default_test_users_collection")]
    pub test_users: String,
    #[serde(default = "default_matches_collection")]
    pub matches: String,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            users: default_users_collection(),
            test_users: default_test_users_collection(),
            matches: default_matches_collection(),
        }
    }
}

fn default_users_collection() -> String {
    "users".to_string()
}
fn default_test_users_collection() -> String {
    "test-users".to_string()
}
fn default_matches_collection() -> String {
    "matches".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with LUME_)
    /// 4. Firebase service account variables (FIREBASE_*)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with LUME_)
            // e.g., LUME_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_firebase_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("LUME")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Overlay the plain `FIREBASE_*` service-account variables used by the
/// deployment environment. `FIREBASE_PRIVATE_KEY` arrives with literal
/// `\n` sequences, which are unescaped here.
fn apply_firebase_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(project_id) = env::var("FIREBASE_PROJECT_ID") {
        builder = builder.set_override("firebase.project_id", project_id)?;
    }
    if let Ok(client_email) = env::var("FIREBASE_CLIENT_EMAIL") {
        builder = builder.set_override("firebase.client_email", client_email)?;
    }
    if let Ok(private_key) = env::var("FIREBASE_PRIVATE_KEY") {
        builder = builder.set_override("firebase.private_key", private_key.replace("\\n", "\n"))?;
    }

    builder.build()
}
