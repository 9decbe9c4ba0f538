//! Free-trial allowance check.

/// Questions included with the free plan before an upgrade is required.
pub const FREE_PLAN_QUERY_ALLOWANCE: i64 = 2;

/// Notice returned when the free allowance is used up.
pub const UPGRADE_NOTICE: &str = "You've used the questions included with the free trial. Upgrade to a monthly or annual plan to keep exploring your contract.";

/// Whether the user has exhausted their free-trial questions.
///
/// Only the free plan is metered here. Unknown plan names are treated as
/// paid rather than locking a paying user out over a naming mismatch,
/// and admins are never limited.
pub fn is_trial_exhausted(plan: &str, query_count: i64, is_admin: bool, allowance: i64) -> bool {
    !is_admin && plan == "free" && query_count >= allowance
}
