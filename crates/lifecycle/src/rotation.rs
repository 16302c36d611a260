//! Round-robin assignee rotation.

use tracing::debug;

/// Picks the assignee that follows `previous` in `assignees`, wrapping around.
///
/// An absent `previous`, or one that is not in the list, selects the first
/// entry. The result always holds exactly one login, even when several
/// assignees were configured; an empty list yields an empty result.
pub fn next_assignee(assignees: &[String], previous: Option<&str>) -> Vec<String> {
    if assignees.is_empty() {
        return Vec::new();
    }

    let index = previous
        .and_then(|previous| assignees.iter().position(|a| a == previous))
        .map_or(0, |position| (position + 1) % assignees.len());

    debug!(
        ?assignees,
        previous = previous.unwrap_or_default(),
        next = %assignees[index],
        "rotated assignee"
    );

    vec![assignees[index].clone()]
}
