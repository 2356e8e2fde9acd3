/// Gap between steps when neither the step nor the queue config sets one (milliseconds)
pub const DEFAULT_DELAY_MS: u64 = 1000;
/// Actions every `ActionMap::with_builtins` map starts with
pub const BUILTIN_LOG_ACTION: &str = "log";
pub const BUILTIN_PRINT_ACTION: &str = "print";
