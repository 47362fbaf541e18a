pub mod notifier;
pub mod validator;
pub mod verdict;
