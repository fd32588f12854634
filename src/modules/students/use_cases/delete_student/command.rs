use crate::shared::core::primitives::{Actor, EpochMillis};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStudent {
    pub student_id: String,
    pub actor: Actor,
    pub deleted_at: EpochMillis,
}
