//! The catalog of DAP adapter events.
//!
//! Same wire-first philosophy as [`crate::commands::KnownCommand`]: an event
//! name outside this catalog is still delivered, tagged [`KnownEvent::Other`].

macro_rules! known_event {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        /// A DAP `event` name.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $(#[doc = concat!("The `", $wire, "` event.")] $variant,)+
            /// Any event name not in this catalog, preserved verbatim.
            Other(String),
        }

        impl $name {
            /// The wire string for this event.
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

known_event!(KnownEvent {
    Initialized => "initialized",
    Stopped => "stopped",
    Continued => "continued",
    Exited => "exited",
    Terminated => "terminated",
    Thread => "thread",
    Output => "output",
    Breakpoint => "breakpoint",
    Module => "module",
    LoadedSource => "loadedSource",
    Process => "process",
    Capabilities => "capabilities",
    ProgressStart => "progressStart",
    ProgressUpdate => "progressUpdate",
    ProgressEnd => "progressEnd",
    Invalidated => "invalidated",
    Memory => "memory",
});
