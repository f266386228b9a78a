//! Property-based tests for the directory search filter

use proptest::prelude::*;
use userdesk::client::directory::filter_records;
use userdesk::shared::User;

fn arb_user() -> impl Strategy<Value = User> {
    (1u64..500, "[A-Za-z]{2,8}", "[A-Za-z]{2,10}", "[a-z]{1,8}@[a-z]{2,6}\\.(io|com|in)").prop_map(
        |(id, first_name, last_name, email)| User {
            id,
            email,
            first_name,
            last_name,
            avatar: format!("https://reqres.in/img/faces/{}-image.jpg", id),
        },
    )
}

fn arb_page() -> impl Strategy<Value = Vec<User>> {
    prop::collection::vec(arb_user(), 0..12)
}

fn haystack(user: &User) -> String {
    format!(
        "{} {}\n{}",
        user.first_name.to_lowercase(),
        user.last_name.to_lowercase(),
        user.email.to_lowercase()
    )
}

proptest! {
    #[test]
    fn test_blank_query_keeps_everything(records in arb_page(), query in "[ \t]{0,4}") {
        prop_assert_eq!(filter_records(&records, &query), records);
    }

    #[test]
    fn test_result_is_ordered_subsequence(records in arb_page(), query in "[a-zA-Z@. ]{1,4}") {
        let filtered = filter_records(&records, &query);

        let mut remaining = records.iter();
        for user in &filtered {
            prop_assert!(remaining.any(|candidate| candidate == user));
        }
    }

    #[test]
    fn test_every_result_contains_query(records in arb_page(), query in "[a-z]{1,3}") {
        for user in filter_records(&records, &query) {
            prop_assert!(haystack(&user).contains(&query));
        }
    }

    #[test]
    fn test_matching_ignores_ascii_case(records in arb_page(), query in "[a-zA-Z@.]{1,4}") {
        prop_assert_eq!(
            filter_records(&records, &query.to_uppercase()),
            filter_records(&records, &query.to_lowercase())
        );
    }

    #[test]
    fn test_record_found_by_own_name(records in arb_page().prop_filter("non-empty", |r| !r.is_empty()), pick in any::<prop::sample::Index>()) {
        let target = pick.get(&records).clone();
        let query = format!("{} {}", target.first_name, target.last_name);

        prop_assert!(filter_records(&records, &query).contains(&target));
    }
}
