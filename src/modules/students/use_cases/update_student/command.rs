use crate::modules::students::core::student::StudentData;
use crate::shared::core::primitives::{Actor, EpochMillis};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStudent {
    pub student_id: String,
    pub data: StudentData,
    pub actor: Actor,
    pub updated_at: EpochMillis,
}
