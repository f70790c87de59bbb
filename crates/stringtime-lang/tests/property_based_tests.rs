//! Property-based tests for template compilation and rendering.
use proptest::prelude::*;
use stringtime_lang::{Command, context};

mod strategies {
    use super::*;

    /// Literal text without directive delimiters, including multi-byte characters.
    pub fn literal() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9 .,!?\n]{0,40}",
            "[こんにちは世界 éàü🎉✓]{0,20}",
            any::<String>(),
        ]
        .prop_filter("Avoid template delimiters", |s| {
            !s.contains("{{") && !s.contains("}}") && !s.ends_with('{') && !s.starts_with('}')
        })
    }

    /// Generates identifiers that are not keywords.
    pub fn ident() -> impl Strategy<Value = String> {
        "[a-z_][a-z0-9_]{0,10}".prop_filter("Avoid reserved keywords", |s| {
            !matches!(s.as_str(), "for" | "end")
        })
    }
}

proptest! {
    #[test]
    fn test_literal_is_preserved(text in strategies::literal()) {
        let template = stringtime_lang::compile(&text).unwrap();

        prop_assert_eq!(template.render(&context! {}).unwrap(), text);
    }

    #[test]
    fn test_literals_around_substitution(
        before in strategies::literal(),
        after in strategies::literal(),
        name in strategies::ident(),
        value in strategies::literal(),
    ) {
        let source = format!("{before}{{{{ {name} }}}}{after}");
        let template = stringtime_lang::compile(&source).unwrap();
        let context = context! { name.as_str() => value.as_str() };

        prop_assert_eq!(
            template.render(&context).unwrap(),
            format!("{before}{value}{after}")
        );
    }

    #[test]
    fn test_render_is_deterministic(
        items in prop::collection::vec(strategies::literal(), 0..8),
        count in 0u64..16,
    ) {
        let template = stringtime_lang::compile(
            "{{ for (items) |item, i| }}{{i}}:{{item}};{{ end }}{{ for (0..count) }}.{{ end }}"
                .replace("count", &count.to_string())
                .as_str(),
        )
        .unwrap();
        let context = context! { "items" => items.clone() };

        let first = template.render(&context).unwrap();
        prop_assert_eq!(&first, &template.render(&context).unwrap());

        let expected = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{i}:{item};"))
            .collect::<String>()
            + &".".repeat(count as usize);
        prop_assert_eq!(first, expected);
    }

    #[test]
    fn test_for_range_iteration_count(start in 0u64..50, end in 0u64..50) {
        let template = stringtime_lang::compile(&format!("{{{{ for ({start}..{end}) }}}}x{{{{ end }}}}")).unwrap();

        let single_range_loop = matches!(
            template.commands(),
            [Command::ForRange { iteration_count, .. }] if *iteration_count == end.saturating_sub(start)
        );
        prop_assert!(single_range_loop);
        prop_assert_eq!(
            template.render(&context! {}).unwrap().len() as u64,
            end.saturating_sub(start)
        );
    }

    #[test]
    fn test_compile_never_panics(source in any::<String>()) {
        let _ = stringtime_lang::compile(&source);
    }
}
