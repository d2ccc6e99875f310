//! The catalog of DAP request commands.
//!
//! Wire compatibility comes first: the string the adapter sees is always the
//! canonical source of truth, and an adapter that speaks a command this
//! engine doesn't recognize yet is represented as [`KnownCommand::Other`]
//! rather than rejected.

macro_rules! known_command {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        /// A DAP request `command` value.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(#[doc = concat!("The `", $wire, "` command.")] $variant,)+
            /// Any command string not in this catalog, preserved verbatim.
            Other(String),
        }

        impl $name {
            /// The wire string for this command.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(s) => s,
                }
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    $($wire => Self::$variant,)+
                    other => Self::Other(other.to_string()),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

known_command!(KnownCommand {
    Initialize => "initialize",
    ConfigurationDone => "configurationDone",
    Launch => "launch",
    Attach => "attach",
    Disconnect => "disconnect",
    Terminate => "terminate",
    Restart => "restart",
    SetBreakpoints => "setBreakpoints",
    SetFunctionBreakpoints => "setFunctionBreakpoints",
    SetExceptionBreakpoints => "setExceptionBreakpoints",
    SetDataBreakpoints => "setDataBreakpoints",
    SetInstructionBreakpoints => "setInstructionBreakpoints",
    Continue => "continue",
    Next => "next",
    StepIn => "stepIn",
    StepOut => "stepOut",
    StepBack => "stepBack",
    ReverseContinue => "reverseContinue",
    RestartFrame => "restartFrame",
    Goto => "goto",
    Pause => "pause",
    StackTrace => "stackTrace",
    Scopes => "scopes",
    Variables => "variables",
    SetVariable => "setVariable",
    Source => "source",
    Threads => "threads",
    TerminateThreads => "terminateThreads",
    Modules => "modules",
    LoadedSources => "loadedSources",
    Evaluate => "evaluate",
    SetExpression => "setExpression",
    StepInTargets => "stepInTargets",
    GotoTargets => "gotoTargets",
    Completions => "completions",
    ExceptionInfo => "exceptionInfo",
    ReadMemory => "readMemory",
    WriteMemory => "writeMemory",
    Disassemble => "disassemble",
    DataBreakpointInfo => "dataBreakpointInfo",
    BreakpointLocations => "breakpointLocations",
    Locations => "locations",
    Cancel => "cancel",
});
