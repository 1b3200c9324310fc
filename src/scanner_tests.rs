//! Scanner Tests
//!
//! Round-trip fidelity and record boundaries for attribute lists, plus tag
//! location across realistic JSX.

#[cfg(test)]
mod tests {
    use crate::scanner::{find_component_tags, find_tags_named, scan_attributes, AttributeRecord};

    fn names(records: &[AttributeRecord]) -> Vec<Option<&str>> {
        records.iter().map(|r| r.name.as_deref()).collect()
    }

    fn joined(records: &[AttributeRecord]) -> String {
        records.iter().map(|r| r.raw.as_str()).collect()
    }

    #[test]
    fn test_round_trip_preserves_source() {
        let inputs = [
            "",
            " id={1}",
            " id={1} ",
            " id={1} label=\"x\" disabled",
            "\n    title={`a ${b}`}\n    {...rest}\n    onClick={() => { go(); }}\n  ",
            " a='it\\'s' b=\"{\" c=plain",
            " aria-label=\"Close\" data-id={id} xlink:href=\"#a\"",
            " = weird ### {unbalanced",
            " ünïcode=\"ñ\" ok",
        ];

        for input in inputs {
            let records = scan_attributes(input);
            assert_eq!(joined(&records), input, "round-trip failed for {:?}", input);
        }
    }

    #[test]
    fn test_records_keep_leading_whitespace() {
        let records = scan_attributes(" id={1}   label=\"x\"");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].raw, " id={1}");
        assert_eq!(records[1].raw, "   label=\"x\"");
        assert_eq!(names(&records), vec![Some("id"), Some("label")]);
    }

    #[test]
    fn test_spread_is_unnamed() {
        let records = scan_attributes(" {...props} id={1}");
        assert_eq!(names(&records), vec![None, Some("id")]);
        assert_eq!(records[0].raw, " {...props}");
    }

    #[test]
    fn test_boolean_prop_ends_at_identifier() {
        let records = scan_attributes(" disabled  id={1}");
        assert_eq!(records[0].raw, " disabled");
        assert_eq!(records[0].name.as_deref(), Some("disabled"));
        assert_eq!(records[1].raw, "  id={1}");
    }

    #[test]
    fn test_nested_braces_stay_in_one_value() {
        let records = scan_attributes(" style={{ color: 'red', nested: { a: 1 } }} next");
        assert_eq!(names(&records), vec![Some("style"), Some("next")]);
        assert_eq!(records[0].raw, " style={{ color: 'red', nested: { a: 1 } }}");
    }

    #[test]
    fn test_escaped_quote_does_not_close_value() {
        let records = scan_attributes(r#" title="say \"hi\"" id"#);
        assert_eq!(records[0].raw, r#" title="say \"hi\"""#);
        assert_eq!(records[1].name.as_deref(), Some("id"));
    }

    #[test]
    fn test_unquoted_value_stops_at_slash() {
        let records = scan_attributes(" size=3/");
        assert_eq!(records[0].raw, " size=3");
        assert_eq!(records[1].raw, "/");
        assert_eq!(records[1].name, None);
    }

    #[test]
    fn test_malformed_chunk_is_unnamed() {
        let records = scan_attributes(" #bad id");
        assert_eq!(names(&records), vec![None, Some("id")]);
        assert_eq!(records[0].raw, " #bad");
    }

    #[test]
    fn test_trailing_whitespace_record() {
        let records = scan_attributes(" id={1} ");
        assert_eq!(records.len(), 2);
        assert!(records[1].is_whitespace());
        assert!(!records[0].is_whitespace());
    }

    #[test]
    fn test_hyphenated_names() {
        let records = scan_attributes(" aria-label=\"Close\" data-test-id=x");
        assert_eq!(names(&records), vec![Some("aria-label"), Some("data-test-id")]);
    }

    #[test]
    fn test_find_self_closing_tag() {
        let source = "return <Field id={1} />;";
        let tags = find_tags_named(source, "Field");
        assert_eq!(tags.len(), 1);

        let tag = &tags[0];
        assert!(tag.self_closing);
        assert_eq!(&source[tag.start..tag.end], "<Field id={1} />");
        assert_eq!(tag.attribute_text(), " id={1} ");
        assert_eq!(tag.attribute_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn test_arrow_function_does_not_end_tag() {
        let source = "<Button onClick={() => save(a > b)} label=\"Go\">Go</Button>";
        let tags = find_tags_named(source, "Button");
        assert_eq!(tags.len(), 1);
        assert!(!tags[0].self_closing);
        assert_eq!(
            tags[0].attribute_names().collect::<Vec<_>>(),
            vec!["onClick", "label"]
        );
        assert_eq!(
            &source[tags[0].start..tags[0].end],
            "<Button onClick={() => save(a > b)} label=\"Go\">"
        );
    }

    #[test]
    fn test_name_must_end_at_boundary() {
        let source = "<FieldGroup a={1} /><Field.Item b /><Field c />";
        let tags = find_tags_named(source, "Field");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].attribute_names().collect::<Vec<_>>(), vec!["c"]);
    }

    #[test]
    fn test_multiline_tag() {
        let source = "<Card\n  title=\"x\"\n  {...rest}\n>\n  body\n</Card>";
        let tags = find_tags_named(source, "Card");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].attributes.len(), 3);
        assert!(tags[0].attributes[2].is_whitespace());
        assert_eq!(tags[0].end, source.find(">\n  body").unwrap() + 1);
    }

    #[test]
    fn test_unterminated_tag_is_ignored() {
        assert!(find_tags_named("<Field id={1}", "Field").is_empty());
    }

    #[test]
    fn test_lowercase_tags_are_not_components() {
        assert!(find_tags_named("<div id={1} />", "div").is_empty());

        let tags = find_component_tags("<div><Panel open /><span /><Footer/></div>");
        let found: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(found, vec!["Panel", "Footer"]);
        assert!(tags[1].attributes.is_empty());
    }

    #[test]
    fn test_comment_in_attribute_list_is_verbatim() {
        let source = "<Field {/* keep */} id={1} />";
        let tags = find_tags_named(source, "Field");
        assert_eq!(tags[0].attributes[0].raw, " {/* keep */}");
        assert_eq!(tags[0].attributes[0].name, None);
    }
}
