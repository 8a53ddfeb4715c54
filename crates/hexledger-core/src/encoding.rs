//! Deterministic hex encoding of a record's canonical payload.
//!
//! The payload is serialized as compact JSON with a fixed field order and
//! rendered as lowercase hex behind a `0x` prefix. Equal inputs always give
//! equal strings; nothing time-dependent is mixed in.

use hexledger_domain::CanonicalPayload;

use crate::CoreError;

const PREFIX: &str = "0x";

pub fn encode(payload: &CanonicalPayload) -> Result<String, CoreError> {
    let json = serde_json::to_vec(payload)?;
    Ok(format!("{}{}", PREFIX, hex::encode(json)))
}

/// Reverses [`encode`]. The `0x` prefix is optional.
pub fn decode(data: &str) -> Result<CanonicalPayload, CoreError> {
    let digits = data.trim().strip_prefix(PREFIX).unwrap_or(data.trim());
    let bytes = hex::decode(digits).map_err(|err| CoreError::Encoding(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| CoreError::Encoding(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hexledger_domain::Category;

    fn payload() -> CanonicalPayload {
        CanonicalPayload {
            description: "Rent".into(),
            amount: "1200".parse().unwrap(),
            category: Category::Expense,
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn encoding_is_deterministic() {
        let first = encode(&payload()).unwrap();
        let second = encode(&payload()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("0x"));
        assert!(first[2..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn encodes_the_exact_json_bytes() {
        let expected = hex::encode(
            r#"{"description":"Rent","amount":"1200","category":"expense","date":"2024-04-01"}"#,
        );
        assert_eq!(encode(&payload()).unwrap(), format!("0x{}", expected));
    }

    #[test]
    fn different_notes_give_different_encodings() {
        let mut noted = payload();
        noted.notes = Some("April".into());
        assert_ne!(encode(&payload()).unwrap(), encode(&noted).unwrap());
        assert_eq!(decode(&encode(&noted).unwrap()).unwrap(), noted);
    }

    #[test]
    fn malformed_hex_is_an_encoding_error() {
        let err = decode("0xzz").unwrap_err();
        assert!(matches!(err, CoreError::Encoding(_)));
    }
}
