//! Value parsers for CLI arguments.

use std::path::PathBuf;

const MAX_ROLLBACK_STEPS: u32 = 100;

pub fn validate_port(value: &str) -> Result<u16, String> {
    let port: u16 = value
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535, got '{value}'"))?;
    if port == 0 {
        return Err("Port 0 is not allowed".to_string());
    }
    Ok(port)
}

/// The file must exist; its contents are checked by the loader.
pub fn validate_config_file_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if !path.is_file() {
        return Err(format!("Configuration file does not exist: '{value}'"));
    }
    Ok(path)
}

pub fn validate_rollback_steps(value: &str) -> Result<u32, String> {
    let steps: u32 = value
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got '{value}'"))?;
    if steps == 0 || steps > MAX_ROLLBACK_STEPS {
        return Err(format!(
            "Rollback steps must be between 1 and {MAX_ROLLBACK_STEPS}"
        ));
    }
    Ok(steps)
}

pub fn validate_host_address(value: &str) -> Result<String, String> {
    let host = value.trim();
    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }
    if host.len() > 253 {
        return Err("Host address is too long".to_string());
    }

    // Dotted digits must be a real IPv4 address; anything else is a hostname.
    if host.chars().all(|c| c.is_ascii_digit() || c == '.')
        && host.parse::<std::net::Ipv4Addr>().is_err()
    {
        return Err(format!("Invalid IPv4 address: '{host}'"));
    }

    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports() {
        for ok in ["1", "80", "3000", "65535"] {
            assert!(validate_port(ok).is_ok(), "{ok}");
        }
        for bad in ["0", "65536", "-1", "abc", ""] {
            assert!(validate_port(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn rollback_steps() {
        assert_eq!(validate_rollback_steps("3"), Ok(3));
        assert!(validate_rollback_steps("0").is_err());
        assert!(validate_rollback_steps("101").is_err());
        assert!(validate_rollback_steps("two").is_err());
    }

    #[test]
    fn hosts() {
        assert_eq!(validate_host_address(" 0.0.0.0 ").unwrap(), "0.0.0.0");
        assert!(validate_host_address("api.astro.local").is_ok());
        assert!(validate_host_address("256.1.1.1").is_err());
        assert!(validate_host_address("my host").is_err());
        assert!(validate_host_address("").is_err());
    }

    #[test]
    fn config_file_must_exist() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());
        assert!(validate_config_file_path("/definitely/not/here.toml").is_err());
    }
}
