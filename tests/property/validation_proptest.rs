//! Property-based tests for edit-form validation

use proptest::prelude::*;
use userdesk::shared::EditUserForm;

fn form(first: String, last: String, email: String) -> EditUserForm {
    EditUserForm {
        first_name: first,
        last_name: last,
        email,
    }
}

proptest! {
    #[test]
    fn test_well_formed_form_yields_patch(
        first in "[A-Za-zÀ-ÿ]{2,12}",
        last in "[A-Za-z' -]{2,16}",
        email in "[a-z0-9._]{0,6}[a-z0-9]@[a-z]{1,8}\\.[a-z]{2,4}",
    ) {
        prop_assume!(!email.contains(".."));
        let patch = form(first.clone(), last.clone(), email.clone()).validate();

        let patch = patch.map_err(|errors| TestCaseError::fail(format!("{:?}", errors)))?;
        prop_assert_eq!(patch.first_name, first);
        prop_assert_eq!(patch.last_name, last);
        prop_assert_eq!(patch.email, email);
    }

    #[test]
    fn test_short_names_are_reported_in_field_order(first in "[A-Za-z]{0,1}", last in "[A-Za-z]{0,1}") {
        let errors = form(first, last, "not-an-email".to_string()).validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();

        prop_assert_eq!(fields, vec!["first_name", "last_name", "email"]);
    }

    #[test]
    fn test_email_without_at_sign_is_rejected(email in "[a-z0-9.]{0,20}") {
        let errors = form("Janet".to_string(), "Weaver".to_string(), email).validate().unwrap_err();

        prop_assert_eq!(errors.len(), 1);
        prop_assert_eq!(errors[0].field, "email");
    }
}
