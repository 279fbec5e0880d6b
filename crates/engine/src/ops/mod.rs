//! One operation per (entity kind, verb).
//!
//! Every operation takes the caller, the raw path ids and a body. Ids are
//! parsed first, the gate runs next, and only then does the operation read or
//! write anything else.

mod characters;
mod costumes;
mod images;
mod locations;
mod measurements;
mod projects;
mod scenes;

use costume_core::error::{CoreError, CoreResult};
use costume_core::types::{parse_id, EntityId};
use validator::Validate;

/// Run the `validator` rules on a request body.
pub(crate) fn validate(input: &impl Validate) -> CoreResult<()> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))
}

/// Parse a list of raw ids, failing on the first malformed one.
pub(crate) fn parse_ids<S: AsRef<str>>(raw: &[S]) -> CoreResult<Vec<EntityId>> {
    raw.iter().map(|r| parse_id(r.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use costume_db::models::project::CreateProject;

    #[test]
    fn validation_errors_map_to_validation() {
        let input = CreateProject {
            title: String::new(),
            ..Default::default()
        };
        assert_matches!(validate(&input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_ids_rejects_any_bad_entry() {
        let good = costume_core::types::new_id().to_string();
        assert_eq!(parse_ids(&[good.as_str()]).unwrap().len(), 1);
        assert_matches!(
            parse_ids(&[good.as_str(), "nope"]),
            Err(CoreError::InvalidIdentifier(raw)) if raw == "nope"
        );
    }
}
