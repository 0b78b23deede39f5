pub mod router;
pub mod types;
pub mod handlers {
    pub mod admin;
    pub mod checkout;
    pub mod clients;
    pub mod health;
    pub mod products;
    pub mod rate;
    pub mod stream;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
