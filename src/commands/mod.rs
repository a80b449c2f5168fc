pub mod builtins;
pub mod cli;
pub mod external;
pub mod registry;

pub use external::PathResolver;
pub use registry::{
    BuiltinCommand, BuiltinRegistry, BuiltinStatus, CommandTable, ExecContext, Resolved,
};
