//! Leave accounting: inclusive day spans, entitlement consumption, and the
//! accept/reject rules applied to new applications.
//!
//! The rule functions in [`accounting`] are pure. [`LeaveService`] wires them to a
//! caller-supplied [`LeaveRepository`] and re-validates at commit time.

pub mod accounting;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use accounting::{
    leave_duration, remaining_balance, used_leave_days, validate_application,
    AcceptedApplication, LeaveBalance, LeavePolicy, ANNUAL_ENTITLEMENT_DAYS,
    LOW_BALANCE_THRESHOLD_DAYS, MAX_SINGLE_APPLICATION_DAYS,
};
pub use domain::{LeaveApplication, LeaveId, LeaveRequest, LeaveSpan, LeaveStatus, LeaveType};
pub use repository::{AppendError, AppendPrecondition, LeaveRepository};
pub use router::{leave_router, LeaveOverview};
pub use service::{LeaveService, LeaveServiceError};
