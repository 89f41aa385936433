//! IBAN redaction
//!
//! Keeps country, check digits and bank code, replaces the account number.

use super::{value_kind, Alteration};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Country layout: (country code, IBAN length, bank code offset in BBAN, bank code length)
const COUNTRY_LAYOUTS: &[(&str, usize, usize, usize)] = &[
    ("AT", 20, 0, 5),
    ("BE", 16, 0, 3),
    ("CH", 21, 0, 5),
    ("DE", 22, 0, 8),
    ("DK", 18, 0, 4),
    ("ES", 24, 0, 4),
    ("FI", 18, 0, 3),
    ("FR", 27, 0, 5),
    ("GB", 22, 0, 4),
    ("IE", 22, 0, 4),
    ("IT", 27, 1, 5),
    ("LI", 21, 0, 5),
    ("LU", 20, 0, 3),
    ("NL", 18, 0, 4),
    ("NO", 15, 0, 4),
    ("PL", 28, 0, 8),
    ("PT", 25, 0, 4),
    ("SE", 24, 0, 3),
];

const DEFAULT_ACCOUNT: &str = "0123456789";

/// Replaces the account number of an IBAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IbanRedaction {
    /// Account number put in place of the original; expected to be 10 digits
    pub overwrite_account: String,
}

impl Default for IbanRedaction {
    fn default() -> Self {
        Self {
            overwrite_account: DEFAULT_ACCOUNT.to_string(),
        }
    }
}

/// Validated IBAN parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbanParts {
    pub country_code: String,
    pub check_digits: String,
    pub bank_code: String,
}

impl IbanRedaction {
    /// Redact an IBAN; invalid input comes back unchanged
    pub fn redact(&self, iban: &str) -> String {
        if self.overwrite_account.chars().count() != 10 {
            tracing::warn!(
                length = self.overwrite_account.chars().count(),
                "Overwrite account should be 10 characters long"
            );
        }
        if !self.overwrite_account.chars().all(|c| c.is_ascii_digit()) {
            tracing::warn!("Overwrite account should only consist of digits");
        }

        match parse_iban(iban) {
            Some(parts) => format!(
                "{}{}{}{}",
                parts.country_code, parts.check_digits, parts.bank_code, self.overwrite_account
            ),
            None => {
                tracing::warn!("IBAN is not valid, returning the original value");
                iban.to_string()
            }
        }
    }
}

impl Alteration for IbanRedaction {
    fn alter(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.redact(s)),
            other => {
                tracing::warn!(
                    kind = value_kind(other),
                    "IBAN redaction expects a string, value left unchanged"
                );
                other.clone()
            }
        }
    }
}

/// Validate an IBAN and split out the parts kept by the redaction
///
/// Whitespace is ignored and letters are case-insensitive. Only countries with
/// a known layout are accepted.
pub fn parse_iban(input: &str) -> Option<IbanParts> {
    let iban: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if iban.len() < 5 || !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    let (country, rest) = iban.split_at(2);
    let (check_digits, bban) = rest.split_at(2);
    if !country.chars().all(|c| c.is_ascii_uppercase())
        || !check_digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let &(_, length, bank_offset, bank_len) =
        COUNTRY_LAYOUTS.iter().find(|(code, ..)| *code == country)?;
    if iban.len() != length || !checksum_valid(&iban) {
        return None;
    }

    Some(IbanParts {
        country_code: country.to_string(),
        check_digits: check_digits.to_string(),
        bank_code: bban.get(bank_offset..bank_offset + bank_len)?.to_string(),
    })
}

/// ISO 13616 mod-97 check over the rearranged IBAN
fn checksum_valid(iban: &str) -> bool {
    let rearranged = iban[4..].chars().chain(iban[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        let Some(digit) = c.to_digit(36) else {
            return false;
        };
        remainder = if digit >= 10 {
            (remainder * 100 + digit) % 97
        } else {
            (remainder * 10 + digit) % 97
        };
    }
    remainder == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("DE89370400440532013000" ; "compact")]
    #[test_case("DE89 3704 0044 0532 0130 00" ; "grouped")]
    #[test_case("de89370400440532013000" ; "lowercase")]
    fn test_valid_german_iban(input: &str) {
        let parts = parse_iban(input).unwrap();
        assert_eq!(parts.country_code, "DE");
        assert_eq!(parts.check_digits, "89");
        assert_eq!(parts.bank_code, "37040044");
    }

    #[test]
    fn test_redact_german_iban() {
        let redaction = IbanRedaction::default();
        assert_eq!(
            redaction.redact("DE89370400440532013000"),
            "DE89370400440123456789"
        );
    }

    #[test]
    fn test_other_countries() {
        assert_eq!(parse_iban("GB82WEST12345698765432").unwrap().bank_code, "WEST");
        assert_eq!(parse_iban("NL91ABNA0417164300").unwrap().bank_code, "ABNA");
        assert_eq!(parse_iban("AT611904300234573201").unwrap().bank_code, "19043");
    }

    #[test]
    fn test_bad_checksum_is_returned() {
        let redaction = IbanRedaction::default();
        assert_eq!(
            redaction.redact("DE88370400440532013000"),
            "DE88370400440532013000"
        );
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        assert!(parse_iban("DE8937040044053201300").is_none());
        assert!(parse_iban("DE").is_none());
    }

    #[test]
    fn test_custom_overwrite_account_is_used_even_if_odd() {
        let redaction = IbanRedaction {
            overwrite_account: "12AB".to_string(),
        };
        assert_eq!(redaction.redact("DE89370400440532013000"), "DE893704004412AB");
    }
}
