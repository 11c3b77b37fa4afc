//! Cache types for catalog service responses.

use ironvale_core::{Brand, Category, PriorityEntry, Product, Subcategory};

use super::resolve::Resolution;

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Resolution(Box<Resolution>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
    Subcategories(Vec<Subcategory>),
    Brands(Vec<Brand>),
    Priorities(Vec<PriorityEntry>),
}
