use rstest::rstest;
use smol_str::SmolStr;

use super::error::CompileError;
use super::{Command, Compiler, Options};
use crate::lexer::error::LexerError;
use crate::parser::error::ParseError;
use crate::range::{Position, Range};

fn range(line: u32, start: usize, end: usize) -> Range {
    Range::new(Position::new(line, start), Position::new(line, end))
}

fn literal(text: &str) -> Command {
    Command::Literal(text.to_string())
}

fn substitution(name: &str, range: Range) -> Command {
    Command::Substitution {
        name: SmolStr::new(name),
        range,
    }
}

fn for_range(iteration_count: u64, index_name: Option<&str>, body: Vec<Command>) -> Command {
    Command::ForRange {
        iteration_count,
        index_name: index_name.map(SmolStr::new),
        body,
    }
}

#[rstest]
#[case::plain("Hello World!", vec![literal("Hello World!")])]
#[case::empty("", vec![])]
#[case::substitution(
    "Hi {{name}}!",
    vec![literal("Hi "), substitution("name", range(1, 6, 10)), literal("!")])]
#[case::whitespace_in_directive(
    "Hi {{  name\t}}!",
    vec![literal("Hi "), substitution("name", range(1, 8, 12)), literal("!")])]
#[case::leading_directive(
    "{{name}} tail",
    vec![substitution("name", range(1, 3, 7)), literal(" tail")])]
#[case::adjacent_directives(
    "{{a}}{{b}}",
    vec![substitution("a", range(1, 3, 4)), substitution("b", range(1, 8, 9))])]
#[case::dotted_name(
    "{{blog.date.created}}",
    vec![substitution("blog.date.created", range(1, 3, 20))])]
#[case::empty_directive("a{{ }}b", vec![literal("a"), literal("b")])]
#[case::multi_line(
    "line 1\n{{name}}\n",
    vec![literal("line 1\n"), substitution("name", range(2, 3, 7)), literal("\n")])]
#[case::unicode_literal(
    "こんにちは {{name}} 🎉",
    vec![literal("こんにちは "), substitution("name", range(1, 9, 13)), literal(" 🎉")])]
#[case::single_braces("{a} { b }", vec![literal("{a} { b }")])]
#[case::for_range(
    "{{ for(0..4) }}Hello World!\n{{ end }}",
    vec![for_range(4, None, vec![literal("Hello World!\n")])])]
#[case::for_range_with_index(
    "{{ for(0..4) |i| }}Index #{{i}}\n{{ end }}",
    vec![for_range(4, Some("i"), vec![
        literal("Index #"),
        substitution("i", range(1, 29, 30)),
        literal("\n"),
    ])])]
#[case::for_range_offset("{{ for (2..5) }}x{{ end }}", vec![for_range(3, None, vec![literal("x")])])]
#[case::for_range_reversed("{{ for (5..2) }}x{{ end }}", vec![for_range(0, None, vec![literal("x")])])]
#[case::for_each(
    "{{ for (list) |item, i| }}{{item}}{{ end }}",
    vec![Command::ForEach {
        list_name: "list".into(),
        item_name: "item".into(),
        index_name: Some("i".into()),
        body: vec![substitution("item", range(1, 29, 33))],
        range: range(1, 4, 24),
    }])]
#[case::nested_loops(
    "{{ for (0..2) }}a{{ for (0..3) }}b{{ end }}c{{ end }}",
    vec![for_range(2, None, vec![
        literal("a"),
        for_range(3, None, vec![literal("b")]),
        literal("c"),
    ])])]
#[case::empty_loop_body("{{ for (0..2) }}{{ end }}", vec![for_range(2, None, vec![])])]
#[case::end_without_loop("a{{ end }}b", vec![literal("a"), literal("b")])]
#[case::implicitly_closed(
    "{{ for (0..2) }}open",
    vec![for_range(2, None, vec![literal("open")])])]
fn test_compile(#[case] input: &str, #[case] expected: Vec<Command>) {
    assert_eq!(Compiler::default().compile(input), Ok(expected));
}

#[rstest]
#[case::unclosed_directive_brace(
    "Hi {{user_name}!",
    CompileError::Parse(ParseError::Lexer(LexerError::MismatchedTemplateDelimiter(range(1, 15, 16)))))]
#[case::unopened_directive_brace(
    "Hi {user_name}}!",
    CompileError::MismatchedTemplateDelimiter(range(1, 14, 16)))]
#[case::unterminated_directive(
    "Hi {{user_name",
    CompileError::Parse(ParseError::MismatchedTemplateDelimiter(range(1, 15, 15), "EOF".to_string())))]
#[case::close_without_open(
    "Hi user_name}}!",
    CompileError::MismatchedTemplateDelimiter(range(1, 13, 15)))]
#[case::two_names(
    "{{a b}}",
    CompileError::Parse(ParseError::MismatchedTemplateDelimiter(range(1, 5, 6), "b".to_string())))]
#[case::invalid_start(
    "{{ (list) }}",
    CompileError::Parse(ParseError::InvalidToken(range(1, 4, 5), "(".to_string())))]
#[case::invalid_char(
    "{{ na#me }}",
    CompileError::Parse(ParseError::Lexer(LexerError::InvalidToken(range(1, 6, 7), "#".to_string()))))]
#[case::missing_item_capture(
    "{{ for (list) }}{{ end }}",
    CompileError::Parse(ParseError::NoItemVariableCapture(range(1, 4, 14), "list".to_string())))]
fn test_compile_error(#[case] input: &str, #[case] expected: CompileError) {
    assert_eq!(Compiler::default().compile(input), Err(expected));
}

#[rstest]
#[case::unexpected_end("a{{ end }}", CompileError::UnexpectedEnd(range(1, 5, 8)))]
#[case::unclosed_loop("{{ for (0..2) }}open", CompileError::UnclosedLoop(range(1, 4, 14)))]
#[case::innermost_unclosed(
    "{{ for (0..2) }}{{ for (xs) |x| }}",
    CompileError::UnclosedLoop(range(1, 20, 32)))]
fn test_compile_strict(#[case] input: &str, #[case] expected: CompileError) {
    let compiler = Compiler::new(Options { strict: true });
    assert_eq!(compiler.compile(input), Err(expected));
}

#[test]
fn test_strict_accepts_balanced_loops() {
    let compiler = Compiler::new(Options { strict: true });
    assert!(compiler.compile("{{ for (0..1) }}{{ end }}").is_ok());
}
