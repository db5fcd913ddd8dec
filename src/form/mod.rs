pub mod state;
pub mod template;
pub mod validator;
