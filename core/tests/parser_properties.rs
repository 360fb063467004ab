use std::fs;

use option_engine_core::{CommandLineParser, OptionRecord, QuoteResolver, parse};

fn record(name: &str, arguments: &[&str]) -> OptionRecord {
    OptionRecord::new(name, arguments.iter().map(|a| a.to_string()).collect())
}

// ---------------------------------------------------------------------------
// Delimiters and quoting
// ---------------------------------------------------------------------------

#[test]
fn delimiter_forms_produce_the_same_record() {
    let colon = parse(["--opt:v"]);
    let equals = parse(["--opt=v"]);
    let separate = parse(["--opt", "v"]);

    assert_eq!(colon.options(), &[record("opt", &["v"])]);
    assert_eq!(colon, equals);
    assert_eq!(equals, separate);
}

#[test]
fn single_quotes_are_literal_and_reject_interior_quotes() {
    let ok = parse(["--msg", "'plain text'"]);
    assert_eq!(ok.options(), &[record("msg", &["plain text"])]);

    let literal = parse(["--msg", r"'no \escapes\ here'"]);
    assert_eq!(literal.options(), &[record("msg", &[r"no \escapes\ here"])]);

    let bad = parse(["--msg", "'it''s fine'"]);
    assert!(bad.has_error());
    assert_eq!(
        bad.errors(),
        &["Unexpected single quote in argument: 'it''s fine' for option '--msg'".to_string()]
    );
}

#[test]
fn double_quotes_resolve_escaped_quote() {
    let result = parse(["--msg", r#""a\"b""#]);
    assert_eq!(result.options(), &[record("msg", &["a\"b"])]);
}

#[test]
fn custom_newline_source_is_honored() {
    let parser = CommandLineParser::new(QuoteResolver::new("\r\n"));
    let result = parser.parse(["--msg", "\"one\\\r\ntwo\""]);
    assert_eq!(result.options(), &[record("msg", &["one\r\ntwo"])]);
}

// ---------------------------------------------------------------------------
// Response files
// ---------------------------------------------------------------------------

#[test]
fn response_file_expands_to_token_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("options.rsp");
    fs::write(&path, "# comment\n--foo bar\n\n--baz \"hello world\"\n").unwrap();

    let tokens = option_engine_core::expand_response_file(&path).unwrap();
    assert_eq!(tokens, vec!["--foo", "bar", "--baz", "hello world"]);

    let result = parse([format!("@{}", path.display())]);
    assert_eq!(
        result.options(),
        &[record("foo", &["bar"]), record("baz", &["hello world"])]
    );
}

#[test]
fn nested_response_directives_are_not_expanded() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("inner.rsp");
    let outer = dir.path().join("outer.rsp");
    fs::write(&inner, "--inner\n").unwrap();
    fs::write(&outer, format!("--files @{}\n", inner.display())).unwrap();

    let result = parse([format!("@{}", outer.display())]);
    assert!(!result.has_error());
    assert_eq!(
        result.try_get_option_argument_list("files"),
        Some(vec![format!("@{}", inner.display()).as_str()])
    );
    assert!(!result.is_option_set("inner"));
}

#[test]
fn response_file_errors_do_not_stop_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.rsp");
    let result = parse([
        "--a".to_string(),
        format!("@{}", missing.display()),
        "--b".to_string(),
    ]);

    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].starts_with("The response file '"));
    assert_eq!(result.options(), &[record("a", &[]), record("b", &[])]);
}

// ---------------------------------------------------------------------------
// Tool name and boundary prefixes
// ---------------------------------------------------------------------------

#[test]
fn bare_single_dash_at_start_is_the_tool_name() {
    let result = parse(["-"]);
    assert_eq!(result.tool_name(), Some("-"));
    assert!(result.options().is_empty());
}

#[test]
fn bare_double_dash_after_tool_is_unexpected() {
    let result = parse(["tool", "--"]);
    assert_eq!(result.errors(), &["Unexpected argument --".to_string()]);
}

#[test]
fn option_start_without_name_is_reported_and_dropped() {
    let result = parse(["--a", "--=v"]);
    assert_eq!(result.errors(), &["Missing option name in argument --=v".to_string()]);
    assert_eq!(result.options(), &[record("a", &[])]);
    assert_eq!(result.to_args(), vec!["--a"]);
}

#[test]
fn quoted_tool_name_is_resolved() {
    let result = parse(["'my tool'", "--x"]);
    assert_eq!(result.tool_name(), Some("my tool"));
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

#[test]
fn reparsing_reconstructed_args_is_idempotent() {
    let inputs: Vec<Vec<&str>> = vec![
        vec!["tool", "--a:1", "--b", "x", "y", "-c"],
        vec!["--filter=\"'quoted'\"", "--path", "' spaced '"],
        vec!["--neg", "'-5'", "--empty:", "--at", "'@file'"],
        vec!["run", "--msg", r#""a\"b""#, "--repeat", "1", "--repeat", "2"],
        vec!["--x", r"'\$", "--y", r"'a\`b", "--z", "'$HOME"],
        vec!["--x", "'x\\\ny", "--y", "'x\\\\\ny"],
        vec!["--msg", r#"'say "$HOME""#, "--path", r"'C:\dir\"],
    ];

    for args in inputs {
        let first = parse(args.clone());
        assert!(!first.has_error(), "unexpected errors for {args:?}: {:?}", first.errors());
        let second = parse(first.to_args());
        assert_eq!(first, second, "round trip changed result for {args:?}");
    }
}

#[test]
fn parse_result_serializes_to_json() {
    let result = parse(["tool", "--a", "1"]);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["tool_name"], "tool");
    assert_eq!(json["options"][0]["name"], "a");
    assert_eq!(json["options"][0]["arguments"][0], "1");
}
