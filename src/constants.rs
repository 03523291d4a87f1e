//! Centralized constants for defaults, payload keys, and permissions.

/// Namespace used when neither flag, env var, nor config file names one.
pub const DEFAULT_NAMESPACE: &str = "flux-system";

/// Default deadline for store operations (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Longest accepted store deadline (30 days).
pub const MAX_TIMEOUT_SECS: u64 = 30 * 24 * 3600;

/// Default directory holding the file-backed resource store.
pub const DEFAULT_STORE_DIR: &str = "/var/lib/helmcred";

/// Default location of the optional configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/helmcred/config.toml";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "HELMCRED_LOG";

/// Permission mode for the store directory.
pub const STORE_DIR_MODE: u32 = 0o700;

/// Permission mode for the store file.
pub const STORE_FILE_MODE: u32 = 0o600;

/// How often a blocked store call re-tries the store lock.
pub const LOCK_POLL_INTERVAL_MS: u64 = 25;

/// Maximum length of a DNS-1123 subdomain name.
pub const MAX_NAME_LEN: usize = 253;

/// Payload key for the basic-auth username.
pub const KEY_USERNAME: &str = "username";

/// Payload key for the basic-auth password.
pub const KEY_PASSWORD: &str = "password";

/// Payload key for the TLS client certificate.
pub const KEY_CERT_FILE: &str = "certFile";

/// Payload key for the TLS client key.
pub const KEY_KEY_FILE: &str = "keyFile";

/// Payload key for the CA bundle.
pub const KEY_CA_FILE: &str = "caFile";

/// `apiVersion` written into exported documents.
pub const EXPORT_API_VERSION: &str = "v1";

/// `kind` written into exported documents.
pub const EXPORT_KIND: &str = "Secret";
