//! One module per subcommand.

pub mod audit_cmd;
pub mod biometric;
pub mod completions;
pub mod delete;
pub mod exists;
pub mod get;
pub mod list;
pub mod mask;
pub mod store;
pub mod validate;
