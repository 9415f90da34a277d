// Tagmark services
// Services provide supporting functionality: access control, settings and page titles.

pub mod auth_gate;
pub mod settings_engine;
pub mod title_resolver;
