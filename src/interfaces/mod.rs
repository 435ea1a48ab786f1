pub mod dashboard;
pub mod http;
pub mod state;

pub use state::AppState;
