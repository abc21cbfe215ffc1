use std::ops::Deref;

use serde::Deserialize;

/// Human-readable duration, e.g. `"30s"`, `"5m"` or `"1h 30m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let mut total = std::time::Duration::default();
        for part in raw.split_whitespace() {
            let unit_at = part
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(|| serde::de::Error::custom("Duration is missing a unit"))?;
            let (value, unit) = part.split_at(unit_at);
            let value = value
                .parse::<u64>()
                .map_err(|_| serde::de::Error::custom("Invalid duration"))?;
            let seconds = match unit {
                "s" => value,
                "m" => value * 60,
                "h" => value * 60 * 60,
                "d" => value * 24 * 60 * 60,
                _ => return Err(serde::de::Error::custom("Invalid duration unit")),
            };
            total += std::time::Duration::from_secs(seconds);
        }
        Ok(Self(total))
    }
}
