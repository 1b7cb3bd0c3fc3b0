//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Dirty-flag memoization
//! - Handle collections
//! - Logging utilities

pub mod math;
pub mod cache;
pub mod collections;
pub mod logging;
