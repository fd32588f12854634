// Pure checks run on student form input before anything is written.

use crate::modules::students::core::student::StudentData;
use crate::shared::core::primitives::non_blank;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} is not a valid email address: {value}")]
    InvalidEmail { field: &'static str, value: String },

    #[error("end date must not be before start date")]
    InvalidInterval,

    #[error("section name must not contain '/': {0}")]
    InvalidSectionName(String),
}

/// Section names double as document keys, so a path separator is refused.
pub fn validate_section_name(name: &str) -> Result<(), ValidationError> {
    if name.contains('/') {
        return Err(ValidationError::InvalidSectionName(name.trim().to_string()));
    }
    Ok(())
}

pub fn validate_student(data: &StudentData) -> Result<(), ValidationError> {
    if non_blank(&data.name).is_none() {
        return Err(ValidationError::Required("name"));
    }
    if non_blank(&data.program).is_none() {
        return Err(ValidationError::Required("program"));
    }
    // A student may be unassigned; only a given section name is checked.
    if let Some(section) = data.section_name() {
        validate_section_name(section)?;
    }
    check_email("email", &data.email)?;
    check_email("internshipEmail", &data.internship_email)?;
    if let (Some(start), Some(end)) = (data.start_date, data.end_date) {
        if end < start {
            return Err(ValidationError::InvalidInterval);
        }
    }
    Ok(())
}

fn check_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let Some(address) = non_blank(value) else {
        return Ok(());
    };
    let invalid = || ValidationError::InvalidEmail {
        field,
        value: address.to_string(),
    };
    if address.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = address.split_once('@').ok_or_else(invalid)?;
    let domain_ok = domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'));
    if local.is_empty() || domain.contains('@') || !domain_ok {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod student_validation_tests {
    use super::*;
    use crate::tests::fixtures::students::StudentDataBuilder;
    use chrono::NaiveDate;
    use rstest::rstest;

    #[rstest]
    fn it_should_accept_a_complete_form() {
        assert_eq!(validate_student(&StudentDataBuilder::new().build()), Ok(()));
    }

    #[rstest]
    #[case(StudentDataBuilder::new().name("  "), ValidationError::Required("name"))]
    #[case(StudentDataBuilder::new().program(""), ValidationError::Required("program"))]
    fn it_should_require_identifying_fields(
        #[case] builder: StudentDataBuilder,
        #[case] expected: ValidationError,
    ) {
        assert_eq!(validate_student(&builder.build()), Err(expected));
    }

    #[rstest]
    #[case("juan")]
    #[case("juan@")]
    #[case("@school.edu")]
    #[case("juan@school")]
    #[case("juan@@school.edu")]
    #[case("juan dela@school.edu")]
    fn it_should_reject_malformed_emails(#[case] email: &str) {
        let data = StudentDataBuilder::new().email(email).build();
        assert!(matches!(
            validate_student(&data),
            Err(ValidationError::InvalidEmail { field: "email", .. })
        ));
    }

    #[rstest]
    fn it_should_allow_blank_emails() {
        let data = StudentDataBuilder::new().email("").internship_email("").build();
        assert_eq!(validate_student(&data), Ok(()));
    }

    #[rstest]
    fn it_should_accept_a_student_without_a_section() {
        let data = StudentDataBuilder::new().section("  ").build();
        assert_eq!(validate_student(&data), Ok(()));
    }

    #[rstest]
    fn it_should_reject_a_section_name_with_a_path_separator() {
        let data = StudentDataBuilder::new().section("BSIT/4A").build();
        assert_eq!(
            validate_student(&data),
            Err(ValidationError::InvalidSectionName("BSIT/4A".into()))
        );
    }

    #[rstest]
    fn it_should_reject_an_end_date_before_the_start_date() {
        let data = StudentDataBuilder::new()
            .start_date(NaiveDate::from_ymd_opt(2024, 5, 1))
            .end_date(NaiveDate::from_ymd_opt(2024, 1, 1))
            .build();
        assert_eq!(validate_student(&data), Err(ValidationError::InvalidInterval));
    }
}
