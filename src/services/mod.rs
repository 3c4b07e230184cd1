// Tabdock services
// Process-wide collaborators shared by every window.

pub mod activity_codec;
pub mod drag_reconciliation;
pub mod event_bus;
pub mod settings_engine;
