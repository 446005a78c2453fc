pub mod http;
pub mod settings_text;
