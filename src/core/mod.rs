//! Core wallet functionality
//!
//! This module contains the core wallet functionality: the session,
//! credential vault, cryptography, swap building, and transaction
//! submission.

pub mod crypto;
pub mod swap;
pub mod transactions;
pub mod vault;
pub mod wallet;
