//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the AI collaborator logic so route handlers can stay
//! focused on request decoding and status mapping.

pub mod genealogy;
