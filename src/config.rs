use std::path::PathBuf;

use assistant_api::BackendConfig;

pub const BACKEND_HOST_ENV_VAR: &str = "ASSISTANT_BACKEND_HOST";
pub const BACKEND_PORT_ENV_VAR: &str = "ASSISTANT_BACKEND_PORT";
pub const BOT_NAME_ENV_VAR: &str = "ASSISTANT_BOT_NAME";
pub const DOWNLOAD_DIR_ENV_VAR: &str = "ASSISTANT_DOWNLOAD_DIR";

/// Default display name the backend emits as `name` on bot messages.
pub const DEFAULT_BOT_NAME: &str = "Ассистент";

/// Client configuration: backend endpoint plus the display names the
/// sender-matching logic depends on.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    /// Must stay consistent with what the backend emits as `name`,
    /// otherwise generation-end correlation degrades to a no-op.
    pub bot_name: String,
    /// Target directory for auto-downloaded deliverables.
    pub download_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            download_dir: PathBuf::from("."),
        }
    }
}

impl AppConfig {
    /// Build a config from `ASSISTANT_*` environment variables, falling back
    /// to defaults for unset or blank values.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(host) = non_blank_env(BACKEND_HOST_ENV_VAR) {
            config.backend.host = host;
        }
        if let Some(port) = non_blank_env(BACKEND_PORT_ENV_VAR) {
            if let Ok(port) = port.parse() {
                config.backend.port = port;
            }
        }
        if let Some(bot_name) = non_blank_env(BOT_NAME_ENV_VAR) {
            config.bot_name = bot_name;
        }
        if let Some(dir) = non_blank_env(DOWNLOAD_DIR_ENV_VAR) {
            config.download_dir = PathBuf::from(dir);
        }

        config
    }

    pub fn with_bot_name(mut self, bot_name: impl Into<String>) -> Self {
        self.bot_name = bot_name.into();
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use super::*;

    struct EnvVarGuard {
        name: &'static str,
        previous: Option<String>,
    }

    impl EnvVarGuard {
        fn set(name: &'static str, value: Option<&str>) -> Self {
            let previous = std::env::var(name).ok();
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }

            Self { name, previous }
        }
    }

    impl Drop for EnvVarGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(value) => std::env::set_var(self.name, value),
                None => std::env::remove_var(self.name),
            }
        }
    }

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        match mutex.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn from_env_falls_back_to_defaults_when_unset_or_blank() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _host = EnvVarGuard::set(BACKEND_HOST_ENV_VAR, None);
        let _port = EnvVarGuard::set(BACKEND_PORT_ENV_VAR, Some("   "));
        let _bot = EnvVarGuard::set(BOT_NAME_ENV_VAR, None);
        let _dir = EnvVarGuard::set(DOWNLOAD_DIR_ENV_VAR, None);

        let config = AppConfig::from_env();
        assert_eq!(
            config.backend.host,
            assistant_api::config::DEFAULT_BACKEND_HOST
        );
        assert_eq!(
            config.backend.port,
            assistant_api::config::DEFAULT_BACKEND_PORT
        );
        assert_eq!(config.bot_name, DEFAULT_BOT_NAME);
    }

    #[test]
    fn from_env_uses_trimmed_overrides() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _host = EnvVarGuard::set(BACKEND_HOST_ENV_VAR, Some("  backend.local  "));
        let _port = EnvVarGuard::set(BACKEND_PORT_ENV_VAR, Some("9001"));
        let _bot = EnvVarGuard::set(BOT_NAME_ENV_VAR, Some("Secretary"));
        let _dir = EnvVarGuard::set(DOWNLOAD_DIR_ENV_VAR, Some("/tmp/deliverables"));

        let config = AppConfig::from_env();
        assert_eq!(config.backend.host, "backend.local");
        assert_eq!(config.backend.port, 9001);
        assert_eq!(config.bot_name, "Secretary");
        assert_eq!(config.download_dir, PathBuf::from("/tmp/deliverables"));
    }

    #[test]
    fn unparsable_port_keeps_the_default() {
        let _env_serialization = lock_unpoisoned(env_lock());
        let _host = EnvVarGuard::set(BACKEND_HOST_ENV_VAR, None);
        let _port = EnvVarGuard::set(BACKEND_PORT_ENV_VAR, Some("not-a-port"));

        let config = AppConfig::from_env();
        assert_eq!(
            config.backend.port,
            assistant_api::config::DEFAULT_BACKEND_PORT
        );
    }
}
