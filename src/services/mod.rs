pub mod admin_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod company_service;
pub mod coupon_service;
pub mod inventory_service;
pub mod offer_service;
pub mod order_service;
