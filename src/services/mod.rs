pub mod auth;
pub mod products;
pub mod service_order_queries;
pub mod service_orders;

pub use auth::AuthService;
pub use products::ProductCatalogService;
pub use service_order_queries::ServiceOrderQueries;
pub use service_orders::ServiceOrderService;
