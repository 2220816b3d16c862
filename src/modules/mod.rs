pub mod checkout;
pub mod gateways;
pub mod health;
pub mod transactions;
