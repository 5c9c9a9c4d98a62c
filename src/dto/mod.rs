pub mod auth;
pub mod cart;
pub mod catalog;
pub mod coupons;
pub mod offers;
pub mod orders;
