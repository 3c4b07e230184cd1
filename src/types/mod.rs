// Tabdock shared type definitions
// Plain data shared between the managers and services.

pub mod drag;
pub mod errors;
pub mod settings;
pub mod tab;
