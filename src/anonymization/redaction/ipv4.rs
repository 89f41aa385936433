//! IPv4 address redaction

use super::{value_kind, Alteration};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::IpAddr;

/// Replaces octets of an IPv4 address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ipv4Redaction {
    /// Leave values that don't parse as an IP address untouched
    pub check_ip: bool,
    /// Octet positions to replace, valid values are 0 to 3
    pub change_parts: Vec<i32>,
    /// Replace octets with a random number between 0 and 255
    pub random: bool,
    /// Replacement used when `random` is off
    pub change_with: String,
}

impl Default for Ipv4Redaction {
    fn default() -> Self {
        Self {
            check_ip: true,
            change_parts: vec![3],
            random: true,
            change_with: "0".to_string(),
        }
    }
}

impl Ipv4Redaction {
    /// Redact an address string
    pub fn redact(&self, ip: &str) -> String {
        if self.check_ip && ip.parse::<IpAddr>().is_err() {
            tracing::warn!(ip = %ip, "Not a valid IP address, returning it unchanged");
            return ip.to_string();
        }

        let mut parts: Vec<String> = ip.split('.').map(str::to_string).collect();
        let mut rng = rand::thread_rng();

        for &part in &self.change_parts {
            if !(0..=3).contains(&part) {
                tracing::warn!(part, "Invalid octet position, valid are 0 to 3");
                continue;
            }
            let replacement = if self.random {
                rng.gen_range(0..=255u8).to_string()
            } else {
                self.change_with.clone()
            };
            match parts.get_mut(part as usize) {
                Some(slot) => *slot = replacement,
                None => tracing::warn!(part, ip = %ip, "Octet position missing in address"),
            }
        }

        parts.join(".")
    }
}

impl Alteration for Ipv4Redaction {
    fn alter(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.redact(s)),
            other => {
                tracing::warn!(
                    kind = value_kind(other),
                    "IP redaction expects a string, value left unchanged"
                );
                other.clone()
            }
        }
    }
}
