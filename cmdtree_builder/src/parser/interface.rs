use crate::parser::CommandError;

/// The input line, with a caret under the position of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    line: String,
    column: usize,
}

impl ErrorContext {
    /// Point at the byte `offset` of `input`.
    pub(crate) fn new(input: &str, offset: usize) -> Self {
        let column = match input.get(..offset) {
            Some(prefix) => prefix.chars().count(),
            None => input.chars().count(),
        };

        Self {
            line: input.to_string(),
            column,
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}^", self.line, " ".repeat(self.column))
    }
}

pub(crate) trait UserInterface {
    fn print_error(&self, error: CommandError);
    fn print_error_context(&self, error_context: ErrorContext);
}

pub(crate) struct ConsoleInterface {}

impl Default for ConsoleInterface {
    fn default() -> Self {
        Self {}
    }
}

impl UserInterface for ConsoleInterface {
    fn print_error(&self, error: CommandError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}

#[cfg(test)]
pub(crate) mod util {
    use crate::parser::{CommandError, ErrorContext, UserInterface};
    use std::cell::RefCell;

    pub(crate) struct InMemoryInterface {
        error: RefCell<Option<String>>,
        error_context: RefCell<Option<ErrorContext>>,
    }

    impl Default for InMemoryInterface {
        fn default() -> Self {
            Self {
                error: RefCell::new(None),
                error_context: RefCell::new(None),
            }
        }
    }

    impl UserInterface for InMemoryInterface {
        fn print_error(&self, error: CommandError) {
            // Assumes print_error() is only ever called once.
            self.error.borrow_mut().replace(error.to_string());
        }

        fn print_error_context(&self, error_context: ErrorContext) {
            // Assumes print_error_context() is only ever called once.
            self.error_context.borrow_mut().replace(error_context);
        }
    }

    impl InMemoryInterface {
        pub(crate) fn consume(self) -> (Option<String>, Option<ErrorContext>) {
            let InMemoryInterface {
                error,
                error_context,
            } = self;

            (error.take(), error_context.take())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("greet 'Ada", 10, "greet 'Ada\n          ^")]
    #[case("count 11", 6, "count 11\n      ^")]
    #[case("count 11", 0, "count 11\n^")]
    #[case("héllo wörld", 7, "héllo wörld\n      ^")]
    #[case("abc", 99, "abc\n   ^")]
    fn error_context(#[case] input: &str, #[case] offset: usize, #[case] expected: &str) {
        assert_eq!(ErrorContext::new(input, offset).to_string(), expected);
    }
}
