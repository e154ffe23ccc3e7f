use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "HealthSync";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "healthsync=info,tower_http=warn"
}

/// Get the application data directory
/// ~/HealthSync/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("HealthSync")
}

/// Default path of the persisted health record.
pub fn default_record_path() -> PathBuf {
    app_data_dir().join("record.json")
}

/// Bearer-token settings for the optional API auth check.
///
/// Permissive by design: requests without a matching token fall back to the
/// development identity instead of being rejected.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token: String,
    pub user: String,
}

/// Runtime configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub record_path: PathBuf,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_api_key: String,
    pub calendar_base_url: String,
    /// OAuth access token for the calendar provider. Absent → stub calendar.
    pub calendar_token: Option<String>,
    pub auth: Option<AuthSettings>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("HEALTHSYNC_BIND")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 5000)));

        let record_path = std::env::var("HEALTHSYNC_RECORD_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_record_path());

        let auth = std::env::var("HEALTHSYNC_API_TOKEN").ok().map(|token| {
            AuthSettings {
                token,
                user: std::env::var("HEALTHSYNC_USER").unwrap_or_else(|_| "owner".into()),
            }
        });

        Self {
            bind_addr,
            record_path,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro".into()),
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            calendar_base_url: std::env::var("GOOGLE_CALENDAR_BASE_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".into()),
            calendar_token: std::env::var("GOOGLE_CALENDAR_ACCESS_TOKEN").ok(),
            auth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("HealthSync"));
    }

    #[test]
    fn default_record_path_under_app_data() {
        let path = default_record_path();
        assert!(path.starts_with(app_data_dir()));
        assert!(path.ends_with("record.json"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }
}
