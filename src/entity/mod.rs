pub mod audit_logs;
pub mod companies;
pub mod company_members;
pub mod coupons;
pub mod order_items;
pub mod orders;
pub mod promotional_offers;
pub mod resources;

pub use audit_logs::Entity as AuditLogs;
pub use companies::Entity as Companies;
pub use company_members::Entity as CompanyMembers;
pub use coupons::Entity as Coupons;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use promotional_offers::Entity as PromotionalOffers;
pub use resources::Entity as Resources;
