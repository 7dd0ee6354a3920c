// LearnHub services
// Services are stateless helpers around the core: view projection, notifications, settings.

pub mod notifications;
pub mod settings_engine;
pub mod view_projector;
