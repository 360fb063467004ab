//! Splits one raw argument into an option name and optional inline value.

/// Characters separating an option name from an inline argument.
pub const NAME_VALUE_DELIMITERS: [char; 3] = [':', '=', ' '];

/// Classification of a single raw argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Starts a new option. `name` has its leading dashes removed.
    OptionStart {
        name: &'a str,
        inline_argument: Option<&'a str>,
    },
    /// A bare value: an option argument, the tool name, or a stray token.
    Value(&'a str),
}

/// Returns `true` when `arg` introduces a new option.
///
/// That is `-x...` (longer than one character, second character not `-`) or
/// `--x...` (longer than two characters, third character not `-`). A bare
/// `-`, a bare `--` and `---x` are values.
///
/// # Examples
///
/// ```
/// use option_engine_core::is_option_start;
///
/// assert!(is_option_start("-x"));
/// assert!(is_option_start("--name"));
/// assert!(!is_option_start("-"));
/// assert!(!is_option_start("--"));
/// assert!(!is_option_start("---name"));
/// assert!(!is_option_start("value"));
/// ```
pub fn is_option_start(arg: &str) -> bool {
    let bytes = arg.as_bytes();
    let single = bytes.len() > 1 && bytes[0] == b'-' && bytes[1] != b'-';
    let double = bytes.len() > 2 && bytes[0] == b'-' && bytes[1] == b'-' && bytes[2] != b'-';
    single || double
}

/// Classifies one raw argument.
///
/// For an option-start token the name ends at the earliest `:`, `=` or
/// space; whatever follows that delimiter is the inline argument.
///
/// # Examples
///
/// ```
/// use option_engine_core::{Token, tokenize};
///
/// assert_eq!(
///     tokenize("--opt=a:b"),
///     Token::OptionStart { name: "opt", inline_argument: Some("a:b") }
/// );
/// assert_eq!(tokenize("-v"), Token::OptionStart { name: "v", inline_argument: None });
/// assert_eq!(tokenize("value"), Token::Value("value"));
/// ```
pub fn tokenize(arg: &str) -> Token<'_> {
    if !is_option_start(arg) {
        return Token::Value(arg);
    }

    match arg.find(NAME_VALUE_DELIMITERS) {
        Some(idx) => Token::OptionStart {
            name: arg[..idx].trim_start_matches('-'),
            inline_argument: Some(&arg[idx + 1..]),
        },
        None => Token::OptionStart {
            name: arg.trim_start_matches('-'),
            inline_argument: None,
        },
    }
}
