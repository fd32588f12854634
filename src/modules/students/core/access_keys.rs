// Access keys unlock the midterm and final survey forms for one student.

use crate::modules::students::core::student::StudentData;
use crate::shared::core::primitives::non_blank;
use uuid::Uuid;

const KEY_LENGTH: usize = 8;

pub fn generate_access_key() -> String {
    Uuid::new_v4().simple().to_string()[..KEY_LENGTH].to_uppercase()
}

/// Fills in blank survey keys. Keys already present are kept as typed.
pub fn ensure_access_keys(data: &mut StudentData) {
    if non_blank(&data.midterms_key).is_none() {
        data.midterms_key = generate_access_key();
    }
    if non_blank(&data.finals_key).is_none() {
        data.finals_key = generate_access_key();
    }
}
