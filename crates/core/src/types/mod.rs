//! Core types for Ironvale.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod catalog;
pub mod id;

pub use cart::{Cart, CartLine};
pub use catalog::{
    Brand, Category, MAX_PRIORITY_LEVEL, PriorityEntry, Product, Subcategory, TargetKind,
    TaxonomyNode,
};
pub use id::*;
