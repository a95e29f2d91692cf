//! # API Module
//!
//! Business rules of the adoption application. Handlers in `front` parse the
//! request and call into these functions; everything here takes the repository
//! and services explicitly so it can be tested without a web server.
//!
//! ## Modules
//!
//! - [`adoption`] - Adoption application lifecycle and listings
//! - [`errors`] - Error taxonomy shared by every workflow
//! - [`favorite`] - Favorites set and the optimistic toggle
//! - [`notification`] - Notification inbox and read state
//! - [`optimistic`] - Local state changes rolled back on failed writes
//! - [`pet`] - Pet creation, listing and detail
//! - [`user`] - User accounts
//! - [`vet`] - Vet directory and nearby search

pub mod adoption;
pub mod errors;
pub mod favorite;
pub mod notification;
pub mod optimistic;
pub mod pet;
pub mod user;
pub mod vet;
