//! Storage key conventions for persisted assessments.
//!
//! Pure string functions. A record lands at the same relative path whether
//! it is written to a local directory or handed to a remote store.

use uuid::Uuid;

pub const ASSESSMENTS_PREFIX: &str = "assessments/";

pub fn user_assessments_prefix(user_id: Uuid) -> String {
    format!("assessments/{user_id}/")
}

pub fn assessment(user_id: Uuid, id: Uuid) -> String {
    format!("assessments/{user_id}/{id}.json")
}
