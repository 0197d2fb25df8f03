pub mod context;
mod environment;
mod error;
mod tree;
mod value;

pub use context::{BufferedContext, StdioContext};
pub use environment::Environment;
pub use error::{RuntimeError, RuntimeErrorKind};
pub use tree::TreeWalkInterpreter;
pub use value::{Function, Value};

/// Control-flow signal threaded out of every statement execution. `Return`
/// must propagate through enclosing blocks and loops until a call boundary
/// catches it.
#[derive(Debug, Clone)]
pub enum ProgramState {
    Run,
    Return(Value),
}

/// Destination for `print` output.
pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}

impl<C: SystemContext + ?Sized> SystemContext for &mut C {
    fn writeln(&mut self, text: &str) {
        (**self).writeln(text);
    }
}
