pub mod chat_app;
pub mod completion_mock;
