//! Stages of a cascading delete.
//!
//! The engine drives a delete through these stages one at a time. Keeping the
//! stage explicit means a failure can always name where it stopped.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeStage {
    /// The caller has passed the gate; nothing has been read yet.
    Authorized,
    /// Every owned descendant has been collected.
    ChildrenResolved,
    /// Descendants are deleted and their references pulled.
    ChildrenPurged,
    /// The target record itself is deleted.
    SelfDeleted,
    /// No remaining record references the target.
    ReferencesDetached,
    Done,
}

impl CascadeStage {
    /// The stage that follows this one. `Done` is terminal.
    pub fn next(self) -> Option<CascadeStage> {
        match self {
            CascadeStage::Authorized => Some(CascadeStage::ChildrenResolved),
            CascadeStage::ChildrenResolved => Some(CascadeStage::ChildrenPurged),
            CascadeStage::ChildrenPurged => Some(CascadeStage::SelfDeleted),
            CascadeStage::SelfDeleted => Some(CascadeStage::ReferencesDetached),
            CascadeStage::ReferencesDetached => Some(CascadeStage::Done),
            CascadeStage::Done => None,
        }
    }

    pub fn is_done(self) -> bool {
        self == CascadeStage::Done
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CascadeStage::Authorized => "authorized",
            CascadeStage::ChildrenResolved => "children_resolved",
            CascadeStage::ChildrenPurged => "children_purged",
            CascadeStage::SelfDeleted => "self_deleted",
            CascadeStage::ReferencesDetached => "references_detached",
            CascadeStage::Done => "done",
        }
    }
}

impl fmt::Display for CascadeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_advance_in_order_and_terminate() {
        let mut stage = CascadeStage::Authorized;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            seen.push(next);
            stage = next;
        }
        assert_eq!(
            seen,
            vec![
                CascadeStage::Authorized,
                CascadeStage::ChildrenResolved,
                CascadeStage::ChildrenPurged,
                CascadeStage::SelfDeleted,
                CascadeStage::ReferencesDetached,
                CascadeStage::Done,
            ]
        );
        assert!(stage.is_done());
    }

    #[test]
    fn display_matches_serialized_name() {
        let json = serde_json::to_value(CascadeStage::SelfDeleted).unwrap();
        assert_eq!(json, "self_deleted");
        assert_eq!(CascadeStage::SelfDeleted.to_string(), "self_deleted");
    }
}
