pub mod checkout_builder;

pub use checkout_builder::build_checkout;
