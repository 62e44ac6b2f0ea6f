pub mod feedback;
pub mod request;
pub mod user;

pub use feedback::SessionFeedback;
pub use request::{RequestStatus, TutoringRequest};
pub use user::{User, UserRole, UserRow};
