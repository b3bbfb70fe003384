pub mod app;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod filter;
pub mod model;
pub mod output;
pub mod paginate;
pub mod runner;
pub mod selection;
pub mod session;
pub mod sort;
pub mod utils;

#[cfg(test)]
mod tests;
