use uuid::Uuid;

use crate::error::CoreError;

/// All entity primary keys are UUIDs, generated by the application.
pub type EntityId = Uuid;

/// Users are owned by the external identity provider; only their id is stored.
pub type UserId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh entity identifier.
pub fn new_id() -> EntityId {
    Uuid::new_v4()
}

/// Parse a raw path segment into an [`EntityId`].
///
/// Ids are compared as parsed values everywhere, so `"A1B2..."` and
/// `"a1b2..."` name the same entity.
pub fn parse_id(raw: &str) -> Result<EntityId, CoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| CoreError::InvalidIdentifier(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_canonical_and_uppercase_forms_to_same_id() {
        let id = new_id();
        let upper = id.to_string().to_uppercase();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert_eq!(parse_id(&upper).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert_matches!(parse_id("42"), Err(CoreError::InvalidIdentifier(raw)) if raw == "42");
        assert_matches!(parse_id(""), Err(CoreError::InvalidIdentifier(_)));
        assert_matches!(
            parse_id("5f0c1a2b-zzzz-4c3d-8e9f-0a1b2c3d4e5f"),
            Err(CoreError::InvalidIdentifier(_))
        );
    }
}
