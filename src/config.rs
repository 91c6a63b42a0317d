//! Runtime configuration.
//!
//! Configuration is resolved once at process startup (after `.env` has been loaded) and then
//! passed into the command handlers. Handlers never read the environment themselves.

use anyhow::{Context, bail};
use devkit_uuid::{EntropySource, Sha1Backend, SystemClock, UuidService, UuidVersion};
use std::str::FromStr;
use std::sync::Arc;

/// Version used by `devkit generate` when none is given.
pub const ENV_DEFAULT_VERSION: &str = "DEVKIT_DEFAULT_VERSION";

/// Upper bound for `devkit generate --count`.
pub const ENV_MAX_COUNT: &str = "DEVKIT_MAX_COUNT";

/// `os` or `uuid`.
pub const ENV_ENTROPY: &str = "DEVKIT_ENTROPY";

/// `native` or `bundled`.
pub const ENV_SHA1: &str = "DEVKIT_SHA1";

pub const DEFAULT_MAX_COUNT: usize = 1000;

/// Configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    default_version: UuidVersion,
    max_count: usize,
    entropy: EntropySource,
    sha1: Sha1Backend,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_version: UuidVersion::V4,
            max_count: DEFAULT_MAX_COUNT,
            entropy: EntropySource::default(),
            sha1: Sha1Backend::default(),
        }
    }
}

impl AppConfig {
    /// Create a new `AppConfig`.
    ///
    /// The default version must be one `generate` can produce on its own, so v5 is rejected.
    pub fn new(
        default_version: UuidVersion,
        max_count: usize,
        entropy: EntropySource,
        sha1: Sha1Backend,
    ) -> anyhow::Result<Self> {
        if default_version.requires_name() {
            bail!("default version cannot be {default_version}: it needs a namespace and a name");
        }
        if max_count == 0 {
            bail!("maximum count must be at least 1");
        }

        Ok(Self {
            default_version,
            max_count,
            entropy,
            sha1,
        })
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from `lookup`, falling back to defaults for unset or blank keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let default_version =
            parse_var(&lookup, ENV_DEFAULT_VERSION)?.unwrap_or(defaults.default_version);
        let max_count = parse_var(&lookup, ENV_MAX_COUNT)?.unwrap_or(defaults.max_count);
        let entropy = parse_var(&lookup, ENV_ENTROPY)?.unwrap_or(defaults.entropy);
        let sha1 = parse_var(&lookup, ENV_SHA1)?.unwrap_or(defaults.sha1);

        Self::new(default_version, max_count, entropy, sha1)
    }

    /// Version `generate` uses when none is given.
    pub fn default_version(&self) -> UuidVersion {
        self.default_version
    }

    /// Largest count `generate` accepts.
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    /// Configured random source.
    pub fn entropy(&self) -> EntropySource {
        self.entropy
    }

    /// Configured SHA-1 backend.
    pub fn sha1(&self) -> Sha1Backend {
        self.sha1
    }

    /// Build the generator this configuration describes.
    pub fn uuid_service(&self) -> UuidService {
        UuidService::from_parts(self.entropy.platform(self.sha1), Arc::new(SystemClock))
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("invalid value for {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.default_version(), UuidVersion::V4);
        assert_eq!(config.max_count(), DEFAULT_MAX_COUNT);
        assert_eq!(config.entropy(), EntropySource::Os);
        assert_eq!(config.sha1(), Sha1Backend::Native);
    }

    #[test]
    fn test_reads_every_variable() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DEFAULT_VERSION, "v7"),
            (ENV_MAX_COUNT, "25"),
            (ENV_ENTROPY, "uuid"),
            (ENV_SHA1, "bundled"),
        ]))
        .unwrap();

        assert_eq!(config.default_version(), UuidVersion::V7);
        assert_eq!(config.max_count(), 25);
        assert_eq!(config.entropy(), EntropySource::Uuid);
        assert_eq!(config.sha1(), Sha1Backend::Bundled);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config =
            AppConfig::from_lookup(lookup_from(&[(ENV_DEFAULT_VERSION, "  "), (ENV_MAX_COUNT, "")]))
                .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_DEFAULT_VERSION, "v9")])).unwrap_err();
        assert!(err.to_string().contains(ENV_DEFAULT_VERSION));

        let err = AppConfig::from_lookup(lookup_from(&[(ENV_MAX_COUNT, "many")])).unwrap_err();
        assert!(err.to_string().contains(ENV_MAX_COUNT));

        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_ENTROPY, "dev-random")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_SHA1, "sha256")])).is_err());
    }

    #[test]
    fn test_rejects_v5_default_and_zero_count() {
        let err = AppConfig::from_lookup(lookup_from(&[(ENV_DEFAULT_VERSION, "v5")])).unwrap_err();
        assert!(err.to_string().contains("namespace"));

        assert!(AppConfig::from_lookup(lookup_from(&[(ENV_MAX_COUNT, "0")])).is_err());
    }

    #[test]
    fn test_uuid_service_uses_configured_backends() {
        let config = AppConfig::new(
            UuidVersion::V4,
            10,
            EntropySource::Uuid,
            Sha1Backend::Bundled,
        )
        .unwrap();
        let service = config.uuid_service();

        assert!(devkit_uuid::is_valid(&service.generate(UuidVersion::V7).unwrap()));
        assert_eq!(
            service
                .generate_v5("6ba7b810-9dad-11d1-80b4-00c04fd430c8", "example.com")
                .unwrap(),
            "cfbff0d1-9375-5685-968c-48ce8b15ae17"
        );
    }
}
