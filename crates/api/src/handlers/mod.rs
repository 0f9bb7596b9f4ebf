pub mod image;
pub mod product;
