pub mod errors;
pub mod db;
pub mod provider;
pub mod service;
pub mod provider_service;

#[cfg(test)]
mod tests;
