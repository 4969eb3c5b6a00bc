pub mod contact_form;
pub mod cors;

pub use contact_form::{CONTACT_BODY_LIMIT, ContactForm};
pub use cors::cors_layer;
