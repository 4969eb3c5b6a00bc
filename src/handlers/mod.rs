pub mod contact;
pub mod health;

pub use contact::contato_handler;
pub use health::{health_handler, root_handler};
