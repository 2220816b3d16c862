pub mod checkout_request;

pub use checkout_request::{CheckoutOptions, CheckoutRequest, ContactInfo, FormField};
