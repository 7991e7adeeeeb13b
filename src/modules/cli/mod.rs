mod user_interface;

pub use user_interface::{build_command, parse_invocation, usage, Invocation};
