pub mod auth;
pub mod feedback;
pub mod profile;
pub mod requests;
pub mod suggestions;
pub mod tutors;
