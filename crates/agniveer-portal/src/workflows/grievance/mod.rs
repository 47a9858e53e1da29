//! Grievances raised by recruits to their commanding officer or commander.
//! Stored and listed as filed; only resolution changes a grievance afterwards.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Addressee, Grievance, GrievanceCategory, GrievanceDraft, GrievanceError, GrievanceId,
    GrievanceStatus,
};
pub use repository::GrievanceRepository;
pub use router::grievance_router;
pub use service::{GrievanceService, GrievanceServiceError};
