// Tagmark state managers
// Managers apply protocol actions to shared state.

pub mod bookmark_manager;
