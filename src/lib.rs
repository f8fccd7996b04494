pub mod database;
pub mod models;
pub mod services;
pub mod web;

#[cfg(test)]
pub mod test_util;
