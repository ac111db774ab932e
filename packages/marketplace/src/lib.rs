// NeedHub - reverse marketplace core
//
// Buyers post requests, sellers answer with offers. Persistence and identity
// live in Supabase; this crate holds the domain rules, the phone verification
// flow, and the collaborator seams that make them testable.

pub mod common;
pub mod config;
pub mod domains;
pub mod error;
pub mod kernel;

pub use config::*;
pub use error::{GatewayError, MarketError, Result, ValidationError};
