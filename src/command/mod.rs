//! Command tree, subcommand resolution and help.
//!
//! ```text
//! TokenStream ──► SubcommandResolver (save / match / gate / discard | restore)
//!                        │
//!                        ├── Leaf  ──► Handler::run(Args)
//!                        └── help  ──► render_help(tree, path)
//! ```

mod gate;
mod help;
mod resolver;
mod tree;

pub use gate::{check_permission, CanRun, Gate, Invocation, PermissionLevel};
pub use help::{render_help, HelpText};
pub use resolver::{check_gates, DispatchError, Resolution, SubcommandResolver};
pub use tree::{
    default_child, find_child, ArgumentSpec, CommandKind, CommandTree, Handler, Subcommand,
    SwitchSpec,
};
