use costume_core::error::{CoreError, CoreResult};
use costume_core::types::UserId;

/// The identity an operation runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(UserId),
}

impl Caller {
    /// The acting user. Anonymous callers are rejected here, before any
    /// store access.
    pub fn require_user(self) -> CoreResult<UserId> {
        match self {
            Caller::User(id) => Ok(id),
            Caller::Anonymous => Err(CoreError::Unauthenticated(
                "Authentication required".to_string(),
            )),
        }
    }
}

impl From<Option<UserId>> for Caller {
    fn from(user: Option<UserId>) -> Self {
        user.map_or(Caller::Anonymous, Caller::User)
    }
}
