pub mod config;
pub mod db;
pub mod forecast;
pub mod load;
pub mod models;
pub mod quadrant;
pub mod report;
pub mod weather;

#[cfg(test)]
pub(crate) mod test_support;
