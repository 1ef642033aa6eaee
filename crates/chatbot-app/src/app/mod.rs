pub mod repl;

pub use repl::{run_repl_mode, ReplCommand};
