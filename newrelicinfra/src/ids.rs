//! Composite resource ID helpers
//!
//! The alerting API addresses a condition by a (policy ID, condition ID)
//! pair, while Terraform tracks a single opaque string per resource
//! instance. The pair is packed into one colon-separated token that every
//! CRUD handler decodes back.

use tfkit::{Result, TfkitError};

/// Pack an ordered tuple of integer IDs into a single token
pub fn serialize_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(":")
}

/// Split a token back into exactly `count` integer components
pub fn parse_ids(id: &str, count: usize) -> Result<Vec<i64>> {
    let parts: Vec<&str> = id.split(':').collect();

    if parts.len() != count {
        return Err(TfkitError::InvalidState(format!(
            "unable to parse ID '{}': expected {} components, got {}",
            id,
            count,
            parts.len()
        )));
    }

    parts
        .iter()
        .map(|part| {
            part.parse::<i64>().map_err(|_| {
                TfkitError::InvalidState(format!(
                    "unable to parse ID '{}': '{}' is not an integer",
                    id, part
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_joins_ids_with_colons() {
        assert_eq!(serialize_ids(&[12345, 67890]), "12345:67890");
        assert_eq!(serialize_ids(&[7]), "7");
    }

    #[test]
    fn parse_splits_token_into_components() {
        assert_eq!(parse_ids("12345:67890", 2).unwrap(), vec![12345, 67890]);
    }

    #[test]
    fn parse_rejects_wrong_arity() {
        let err = parse_ids("12345", 2).unwrap_err();
        assert!(err.to_string().contains("expected 2 components"));

        let err = parse_ids("1:2:3", 2).unwrap_err();
        assert!(err.to_string().contains("got 3"));
    }

    #[test]
    fn parse_rejects_non_integer_components() {
        let err = parse_ids("12345:abc", 2).unwrap_err();
        assert!(err.to_string().contains("not an integer"));
    }

    #[test]
    fn parse_rejects_empty_token() {
        assert!(parse_ids("", 2).is_err());
        assert!(parse_ids("", 1).is_err());
    }

    #[test]
    fn serialize_then_parse_returns_original_pair() {
        let ids = vec![42, 99887766];
        let token = serialize_ids(&ids);
        assert_eq!(parse_ids(&token, 2).unwrap(), ids);
    }

    #[test]
    fn parse_then_serialize_returns_original_token() {
        let token = "314:159";
        let ids = parse_ids(token, 2).unwrap();
        assert_eq!(serialize_ids(&ids), token);
    }
}
