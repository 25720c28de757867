//! State Management
//!
//! Global application state, domain types and the session cache.

pub mod global;
pub mod session;

pub use global::{
    cart_units, provide_global_state, CartLine, GlobalState, Item, Role, User, DEFAULT_CLINICS,
};
