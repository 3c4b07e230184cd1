// Tabdock state managers
// Single-owner state: a window's tab collection, the window itself, saved window state.

pub mod claim_ledger;
pub mod tab_collection;
pub mod window_scene;
pub mod window_state_manager;
