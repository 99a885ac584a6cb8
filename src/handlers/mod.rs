pub mod auth;
pub mod common;
pub mod resources;
pub mod service_orders;

use axum::extract::FromRef;
use std::sync::Arc;

use crate::config::StockPolicy;
use crate::db::DbPool;
use crate::repositories::{
    CategoryRepository, ClientRepository, ContactRepository, PersonnelRepository,
    ProductRepository, RoleRepository, ServiceRepository, SupplierRepository,
};
use crate::services::{
    AuthService, ProductCatalogService, ServiceOrderQueries, ServiceOrderService,
};

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: CategoryRepository,
    pub roles: RoleRepository,
    pub suppliers: SupplierRepository,
    pub clients: ClientRepository,
    pub contacts: ContactRepository,
    pub personnel: PersonnelRepository,
    pub products: ProductRepository,
    pub services: ServiceRepository,
    pub product_catalog: Arc<ProductCatalogService>,
    pub service_orders: Arc<ServiceOrderService>,
    pub service_order_queries: Arc<ServiceOrderQueries>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, stock_policy: StockPolicy) -> Self {
        Self {
            categories: CategoryRepository::new(db_pool.clone()),
            roles: RoleRepository::new(db_pool.clone()),
            suppliers: SupplierRepository::new(db_pool.clone()),
            clients: ClientRepository::new(db_pool.clone()),
            contacts: ContactRepository::new(db_pool.clone()),
            personnel: PersonnelRepository::new(db_pool.clone()),
            products: ProductRepository::new(db_pool.clone()),
            services: ServiceRepository::new(db_pool.clone()),
            product_catalog: Arc::new(ProductCatalogService::new(db_pool.clone())),
            service_orders: Arc::new(ServiceOrderService::new(db_pool.clone(), stock_policy)),
            service_order_queries: Arc::new(ServiceOrderQueries::new(db_pool.clone())),
            auth: Arc::new(AuthService::new(db_pool)),
        }
    }
}

macro_rules! repository_from_state {
    ($($repo:ty => $field:ident),+ $(,)?) => {
        $(
            impl FromRef<AppState> for $repo {
                fn from_ref(state: &AppState) -> Self {
                    state.services.$field.clone()
                }
            }
        )+
    };
}

repository_from_state! {
    CategoryRepository => categories,
    RoleRepository => roles,
    SupplierRepository => suppliers,
    ClientRepository => clients,
    ContactRepository => contacts,
    PersonnelRepository => personnel,
    ProductRepository => products,
    ServiceRepository => services,
}
