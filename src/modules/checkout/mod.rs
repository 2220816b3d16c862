pub mod controllers;
pub mod models;
pub mod services;

pub use models::{CheckoutOptions, CheckoutRequest, ContactInfo};
pub use services::build_checkout;
