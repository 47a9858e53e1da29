use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{LeaveRequest, LeaveSpan};
use crate::workflows::validation::ValidationError;

/// Fixed annual leave allowance. Not derived from rank or tenure.
pub const ANNUAL_ENTITLEMENT_DAYS: u32 = 30;
/// Longest span a single application may cover.
pub const MAX_SINGLE_APPLICATION_DAYS: u32 = 30;
/// Balances below this are flagged for display.
pub const LOW_BALANCE_THRESHOLD_DAYS: u32 = 5;

/// Inclusive number of calendar days between two dates; a same-day span is one day.
///
/// Callers must pass `start <= end`. Dates are plain calendar dates, so the
/// count never drifts with time of day or UTC offset. Use [`LeaveSpan`] to
/// enforce the ordering at the boundary.
pub fn leave_duration(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = end
        .signed_duration_since(start)
        .num_days()
        .unsigned_abs()
        .saturating_add(1);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Days held against the entitlement by pending and approved requests.
pub fn used_leave_days(history: &[LeaveRequest]) -> u32 {
    history
        .iter()
        .filter(|request| request.status.consumes_entitlement())
        .fold(0u32, |used, request| used.saturating_add(request.days()))
}

/// Remaining balance under the standard policy. May be negative when overdrawn.
pub fn remaining_balance(history: &[LeaveRequest]) -> i64 {
    LeavePolicy::default().remaining_balance(history)
}

/// Validate a candidate span against the standard policy.
pub fn validate_application(
    history: &[LeaveRequest],
    candidate: &LeaveSpan,
) -> Result<AcceptedApplication, ValidationError> {
    LeavePolicy::default().validate_application(history, candidate)
}

/// Entitlement rules applied to a recruit's leave history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePolicy {
    pub annual_entitlement: u32,
    pub max_single_application: u32,
    pub low_balance_threshold: u32,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self {
            annual_entitlement: ANNUAL_ENTITLEMENT_DAYS,
            max_single_application: MAX_SINGLE_APPLICATION_DAYS,
            low_balance_threshold: LOW_BALANCE_THRESHOLD_DAYS,
        }
    }
}

impl LeavePolicy {
    pub fn remaining_balance(&self, history: &[LeaveRequest]) -> i64 {
        i64::from(self.annual_entitlement) - i64::from(used_leave_days(history))
    }

    /// Accept or reject a candidate application. Performs no mutation, so it is
    /// safe to call repeatedly; it must be re-run against the committed history
    /// at write time.
    pub fn validate_application(
        &self,
        history: &[LeaveRequest],
        candidate: &LeaveSpan,
    ) -> Result<AcceptedApplication, ValidationError> {
        let requested = candidate.days();

        if requested > self.max_single_application {
            return Err(ValidationError::DurationExceeded {
                requested,
                max: self.max_single_application,
            });
        }

        let remaining = self.remaining_balance(history);
        if i64::from(requested) > remaining {
            return Err(ValidationError::InsufficientBalance {
                requested,
                remaining,
            });
        }

        Ok(AcceptedApplication {
            requested_days: requested,
            balance_before: remaining,
            balance_after: remaining - i64::from(requested),
        })
    }

    pub fn balance(&self, history: &[LeaveRequest]) -> LeaveBalance {
        let used = used_leave_days(history);
        let remaining = self.remaining_balance(history);
        LeaveBalance {
            entitlement: self.annual_entitlement,
            used,
            remaining,
            low_balance: remaining < i64::from(self.low_balance_threshold),
        }
    }

    /// Last end date an application starting on `start` can use without being
    /// rejected, or `None` when not even a single day is available.
    pub fn latest_end_date(&self, start: NaiveDate, history: &[LeaveRequest]) -> Option<NaiveDate> {
        let remaining = self.remaining_balance(history);
        let allowed = remaining.min(i64::from(self.max_single_application));
        if allowed < 1 {
            return None;
        }

        let extra = u64::try_from(allowed - 1).ok()?;
        start.checked_add_days(Days::new(extra))
    }
}

/// Outcome of a successful validation; the caller persists the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceptedApplication {
    pub requested_days: u32,
    pub balance_before: i64,
    pub balance_after: i64,
}

/// Display summary of a recruit's entitlement usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    pub entitlement: u32,
    pub used: u32,
    pub remaining: i64,
    pub low_balance: bool,
}
