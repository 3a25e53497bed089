//! Data models for the notes service.
//!
//! The server owns the shape of a note; the client types only the fields it
//! displays and carries everything else through untouched.

pub mod note;

pub use note::{Note, NoteDraft};
