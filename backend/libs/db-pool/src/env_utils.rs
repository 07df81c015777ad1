//! Environment variable parsing helpers that never panic.

use std::str::FromStr;

/// Parse an environment variable, falling back to `default` when it is
/// missing or fails to parse.
///
/// ```ignore
/// let port: u16 = parse_env_with_default("PORT", 8080);
/// ```
pub fn parse_env_with_default<T: FromStr>(key: &str, default: T) -> T {
    parse_env_optional(key).unwrap_or(default)
}

/// Parse an environment variable, `None` if missing or invalid.
pub fn parse_env_optional<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_parse_env_with_default() {
        std::env::set_var("DB_POOL_TEST_NUMBER", "42");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_NUMBER", 7u32), 42);

        std::env::set_var("DB_POOL_TEST_NUMBER", "not-a-number");
        assert_eq!(parse_env_with_default("DB_POOL_TEST_NUMBER", 7u32), 7);

        std::env::remove_var("DB_POOL_TEST_NUMBER");
        assert_eq!(parse_env_optional::<u32>("DB_POOL_TEST_NUMBER"), None);
    }
}
