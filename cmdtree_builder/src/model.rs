/// The character classes a [`StringArgument`](./struct.StringArgument.html) accepts.
///
/// All classes are allowed by default.
/// Letters outside of ASCII count by their unicode case; characters with no case are `special`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringFeatures {
    /// Allow `' '` and other non-newline whitespace.
    pub spaces: bool,
    /// Allow `'\n'` and `'\r'`.
    pub newlines: bool,
    /// Allow punctuation, symbols and any other character outside the remaining classes.
    pub special: bool,
    /// Allow numeric characters.
    pub numbers: bool,
    /// Allow uppercase letters.
    pub upper: bool,
    /// Allow lowercase letters.
    pub lower: bool,
}

impl Default for StringFeatures {
    fn default() -> Self {
        Self::all()
    }
}

impl StringFeatures {
    /// Allow every character class.
    pub const fn all() -> Self {
        Self {
            spaces: true,
            newlines: true,
            special: true,
            numbers: true,
            upper: true,
            lower: true,
        }
    }

    /// Allow only letters and numbers.
    pub const fn alphanumeric() -> Self {
        Self {
            spaces: false,
            newlines: false,
            special: false,
            numbers: true,
            upper: true,
            lower: true,
        }
    }

    /// Find the first character which falls outside of the allowed classes.
    pub(crate) fn first_rejected(&self, value: &str) -> Option<char> {
        value.chars().find(|c| !self.allows(*c))
    }

    fn allows(&self, c: char) -> bool {
        if c == '\n' || c == '\r' {
            self.newlines
        } else if c.is_whitespace() {
            self.spaces
        } else if c.is_numeric() {
            self.numbers
        } else if c.is_uppercase() {
            self.upper
        } else if c.is_lowercase() {
            self.lower
        } else {
            self.special
        }
    }
}

/// What a [`PathArgument`](./struct.PathArgument.html) must point to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathKind {
    /// Either a file or a directory.
    #[default]
    Any,
    /// A file.
    File,
    /// A directory.
    Directory,
}

impl std::fmt::Display for PathKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathKind::Any => write!(f, "path"),
            PathKind::File => write!(f, "file"),
            PathKind::Directory => write!(f, "directory"),
        }
    }
}

/// Names of nodes, arguments, flags and switches.
/// Starts with a letter or `_`, continues with letters, digits, `_` or `-`.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        }
        _ => false,
    }
}

pub(crate) fn is_shortcut(shortcut: char) -> bool {
    shortcut.is_alphanumeric()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("build", true)]
    #[case("dry-run", true)]
    #[case("_private", true)]
    #[case("v2", true)]
    #[case("", false)]
    #[case("2fast", false)]
    #[case("-flag", false)]
    #[case("has space", false)]
    #[case("semi;colon", false)]
    fn identifier(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(name), expected);
    }

    #[rstest]
    #[case('o', true)]
    #[case('O', true)]
    #[case('7', true)]
    #[case('-', false)]
    #[case(' ', false)]
    fn shortcut(#[case] value: char, #[case] expected: bool) {
        assert_eq!(is_shortcut(value), expected);
    }

    #[rstest]
    #[case(StringFeatures::all(), "Hello, World!\n 42", None)]
    #[case(StringFeatures::alphanumeric(), "abcXYZ123", None)]
    #[case(StringFeatures::alphanumeric(), "abc xyz", Some(' '))]
    #[case(StringFeatures::alphanumeric(), "abc!", Some('!'))]
    #[case(StringFeatures { upper: false, ..StringFeatures::all() }, "abC", Some('C'))]
    #[case(StringFeatures { newlines: false, ..StringFeatures::all() }, "a b\nc", Some('\n'))]
    fn string_features(
        #[case] features: StringFeatures,
        #[case] value: &str,
        #[case] expected: Option<char>,
    ) {
        assert_eq!(features.first_rejected(value), expected);
    }
}
