pub mod command_executor;

pub use command_executor::{
    CommandExecutorError,
    CommandRunner,
    CommandSpec,
    ExecutionResult,
    SystemCommandRunner,
};
