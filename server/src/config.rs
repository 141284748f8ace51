use std::path::PathBuf;

pub const DEFAULT_PORT: &str = "8080";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_STATIC_DIR: &str = "web";

/// Where the home page document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomePage {
    /// Compiled into the binary
    Embedded,
    /// Read from disk on every request
    File(PathBuf),
}

/// Runtime settings, resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to listen on
    pub host: String,

    /// Listening port. Kept as given so that a bad value surfaces at bind time
    pub port: String,

    /// Root directory exposed under `/static/`
    pub static_dir: PathBuf,

    pub home_page: HomePage,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            home_page: HomePage::Embedded,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `STATIC_DIR` and `HOME_PAGE` from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with a custom variable source.
    /// Absent and empty variables both fall back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: var("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string()),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            home_page: var("HOME_PAGE")
                .map(|path| HomePage::File(PathBuf::from(path)))
                .unwrap_or(HomePage::Embedded),
        }
    }

    /// Address handed to the listener, e.g. `0.0.0.0:8080`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_port_uses_default() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "")]));
        assert_eq!(config.port, "8080");
    }

    #[test]
    fn test_port_override() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "9090")]));
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_invalid_port_is_passed_through() {
        let config = ServerConfig::from_lookup(lookup(&[("PORT", "not-a-port")]));
        assert_eq!(config.port, "not-a-port");
    }

    #[test]
    fn test_home_page_from_disk() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOME_PAGE", "web/index.html"),
            ("STATIC_DIR", "assets"),
            ("HOST", "127.0.0.1"),
        ]));
        assert_eq!(config.home_page, HomePage::File(PathBuf::from("web/index.html")));
        assert_eq!(config.static_dir, PathBuf::from("assets"));
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_home_page_means_embedded() {
        let config = ServerConfig::from_lookup(lookup(&[("HOME_PAGE", "")]));
        assert_eq!(config.home_page, HomePage::Embedded);
    }
}
