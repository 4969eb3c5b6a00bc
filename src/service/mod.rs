pub mod health;
pub mod submission;
