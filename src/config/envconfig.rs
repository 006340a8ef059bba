use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Environment-backed configuration. Variables are namespaced with a prefix
/// and a double-underscore section separator, so `APP_DATABASE__URL` fills
/// `database.url` and `APP_AUTH__JWT_SECRET` fills `auth.jwt_secret`.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";

    /// Cross-field checks that serde cannot express; runs after
    /// deserialization.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        load_dotenv();

        let settings = config_rs::Config::builder()
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("reading environment variables for configuration")?;

        let cfg: Self = settings
            .try_deserialize()
            .context("deserializing configuration from environment")?;

        cfg.validate()?;
        Ok(cfg)
    }
}

// A `.env` next to the manifest wins; otherwise search upward from the
// working directory. A missing file is not an error.
fn load_dotenv() {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
}
