pub mod errors;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{run, seed_demo};
pub use state::AppState;
