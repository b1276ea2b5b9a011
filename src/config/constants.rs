// Centralized configuration constants

// HTTP
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_CORS_ALLOWED_ORIGINS: &str = "*";
pub const DEFAULT_CORS_MAX_AGE_SECS: usize = 3600;
pub const HTTP_KEEPALIVE_SECS: u64 = 75;
pub const HTTP_CLIENT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const HTTP_SHUTDOWN_TIMEOUT_SECS: u64 = 30;
pub const MAX_WORKER_THREADS: usize = 256;
/// 64KB, registration bodies are small
pub const MAX_JSON_PAYLOAD_BYTES: usize = 64 * 1024;

// Database (MySQL)
pub const DEFAULT_DB_USER: &str = "careline";
pub const DEFAULT_DB_PASS: &str = "";
pub const DEFAULT_DB_NAME: &str = "careline";
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_POOL: u32 = 5;
pub const DEFAULT_DB_CONN_TIMEOUT_SECS: u64 = 30;

// Password hashing (argon2id defaults)
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
pub const DEFAULT_REHASH_ON_LOGIN: bool = false;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Read endpoint
pub const RECORD_LIST_LIMIT: u32 = 10;
