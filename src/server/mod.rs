pub mod app_state;
pub mod startup;

pub use app_state::AppState;
pub use startup::{configure_routes, start_server};
