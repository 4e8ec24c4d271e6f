use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SIZE_REGEX: Regex =
        Regex::new(r"^\s*(?P<amount>[0-9]+)\s*(?P<unit>[a-z]*)\s*$").unwrap();
}

const KILOBYTE: u64 = 1024;

/// Parses a human readable data size such as `512`, `10kb` or `2 MiB` into bytes.
pub fn size_of(value: &str) -> Result<u64, String> {
    let lowercase = value.to_lowercase();
    let captures = SIZE_REGEX
        .captures(&lowercase)
        .ok_or_else(|| format!("'{}' is not a valid data size", value))?;

    let amount: u64 = captures["amount"]
        .parse()
        .map_err(|_| format!("'{}' is too large to be a data size", value))?;
    let multiplier = match &captures["unit"] {
        "" | "b" => 1,
        "k" | "kb" | "kib" => KILOBYTE,
        "m" | "mb" | "mib" => KILOBYTE.pow(2),
        "g" | "gb" | "gib" => KILOBYTE.pow(3),
        unit => {
            return Err(format!(
                "'{}' is not a valid data size, unknown unit '{}'",
                value, unit
            ))
        }
    };

    amount
        .checked_mul(multiplier)
        .ok_or_else(|| format!("'{}' is too large to be a data size", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_byte_counts() {
        assert_eq!(size_of("0"), Ok(0));
        assert_eq!(size_of("512"), Ok(512));
        assert_eq!(size_of(" 100b "), Ok(100));
    }

    #[test]
    fn parses_units_case_insensitively() {
        assert_eq!(size_of("1KB"), Ok(1024));
        assert_eq!(size_of("4k"), Ok(4096));
        assert_eq!(size_of("2 MiB"), Ok(2 * 1024 * 1024));
        assert_eq!(size_of("1gb"), Ok(1024 * 1024 * 1024));
    }

    #[test]
    fn rejects_garbage() {
        assert!(size_of("").is_err());
        assert!(size_of("kb").is_err());
        assert!(size_of("1.5mb").is_err());
        assert!(size_of("-1").is_err());

        let error = size_of("10parsecs").unwrap_err();
        assert!(error.contains("10parsecs"), "{}", error);
        assert!(error.contains("parsecs'"), "{}", error);
    }

    #[test]
    fn rejects_overflow() {
        assert!(size_of("99999999999999999999").is_err());
        assert!(size_of("99999999999999gb").is_err());
    }
}
