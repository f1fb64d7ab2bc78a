pub mod extra;
pub mod fabric;
pub mod price_group;
pub mod product;
pub mod quote;
