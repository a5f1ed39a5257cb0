pub mod builders;
pub mod payload;
pub mod registry;
pub mod sub_resources;
pub mod views;
pub mod writes;
