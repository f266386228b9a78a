//! Client-side search over the current page.

use crate::shared::user::User;

/// Whether `user` matches an already lowercased, non-blank query
fn matches(user: &User, needle: &str) -> bool {
    let first = user.first_name.to_lowercase();
    let last = user.last_name.to_lowercase();

    first.contains(needle)
        || last.contains(needle)
        || user.email.to_lowercase().contains(needle)
        || format!("{} {}", first, last).contains(needle)
}

/// Records of `records` that match `query`, in their original order.
///
/// A blank query keeps everything. Matching is a case-insensitive substring
/// test against first name, last name, email, or "first last".
pub fn filter_records(records: &[User], query: &str) -> Vec<User> {
    if query.trim().is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|user| matches(user, &needle))
        .cloned()
        .collect()
}
