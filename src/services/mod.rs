// Services module for business logic
pub mod artifact_resolver;
pub mod parameters_renderer;
pub mod pipeline;
pub mod test_runner;
pub mod virtual_environment_manager;
