use crate::modules::students::core::student::StudentData;
use crate::shared::core::primitives::{Actor, EpochMillis};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStudent {
    pub student_id: String,
    pub data: StudentData,
    pub actor: Actor,
    pub created_at: EpochMillis,
}
