pub mod category;
pub mod client;
pub mod contact;
pub mod personnel;
pub mod product;
pub mod role;
pub mod service;
pub mod service_order;
pub mod service_order_personnel;
pub mod service_order_product;
pub mod supplier;

pub use service_order::ServiceOrderState;
