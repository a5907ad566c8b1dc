use super::*;
use crate::{coerce, coerce_explained, CoercionPath};

test_coercer!(test_int, "42", FieldType::int(), 42);
test_coercer!(test_negative_int, "-17", FieldType::int(), -17);
test_coercer!(test_float_for_int, "3.14", FieldType::int(), 3.14);
test_coercer!(test_float, "2.5", FieldType::float(), 2.5);
test_coercer!(test_bool, "True", FieldType::bool(), true);
test_coercer!(test_bool_false, "False", FieldType::bool(), false);
test_coercer!(test_int_for_bool, "1", FieldType::bool(), 1);

test_passthrough!(test_not_a_literal, "forty-two", FieldType::int());
test_passthrough!(test_lowercase_bool, "true", FieldType::bool());
test_passthrough!(test_json_null, "null", FieldType::int().as_optional());
test_passthrough!(test_malformed_list, "['a', 'b'", FieldType::string().as_list());
test_passthrough!(test_empty, "", FieldType::int());
test_passthrough!(test_huge_int, "123456789012345678901234567890", FieldType::int());

// Strings are never parsed, no matter how much they look like something else.
test_passthrough!(test_phone_number, "1234567890", FieldType::string());
test_passthrough!(test_quoted_string, "'quoted'", FieldType::string());
test_passthrough!(test_list_for_string, "[1, 2]", FieldType::string());
test_passthrough!(
    test_string_in_union,
    "42",
    FieldType::union(vec![FieldType::int(), FieldType::string()])
);
test_passthrough!(
    test_string_in_nested_union,
    "True",
    FieldType::union(vec![
        FieldType::bool(),
        FieldType::union(vec![FieldType::string(), FieldType::int()]).as_optional(),
    ])
);

// "None" is null only for types that admit null, and that check comes first.
test_coercer!(test_none_optional_bool, "None", FieldType::bool().as_optional(), null);
test_coercer!(test_none_optional_string, "None", FieldType::string().as_optional(), null);
test_coercer!(
    test_none_union_with_null,
    "None",
    FieldType::union(vec![FieldType::int(), FieldType::null()]),
    null
);
test_passthrough!(test_none_padded, " None", FieldType::string().as_optional());
test_coercer!(test_optional_int, "7", FieldType::int().as_optional(), 7);

// A bare `None` is a literal, so a non-nullable field still gets null and the
// type check rejects it.
test_coercer!(test_none_not_nullable, "None", FieldType::int(), null);

test_coercer!(
    test_list_of_strings,
    "['a', 'b']",
    FieldType::string().as_list(),
    ["a", "b"]
);
test_coercer!(
    test_list_is_not_element_checked,
    "[1, 'two', None]",
    FieldType::int().as_list(),
    [1, "two", null]
);
test_coercer!(
    test_optional_list,
    r#"["x", "y"]"#,
    FieldType::string().as_list().as_optional(),
    ["x", "y"]
);
test_coercer!(
    test_map,
    "{'alice': 1, 'bob': [2.5, 3]}",
    FieldType::map(FieldType::string(), FieldType::float().as_list()),
    {"alice": 1, "bob": [2.5, 3]}
);
test_coercer!(
    test_nested,
    "[{'k': (1, 2)}, {'k': ()}]",
    FieldType::map(FieldType::string(), FieldType::int().as_list()).as_list(),
    [{"k": [1, 2]}, {"k": []}]
);
test_coercer!(
    test_multiline,
    "[\n  'first',\n  'second',\n]\n",
    FieldType::string().as_list(),
    ["first", "second"]
);

#[test_log::test]
fn test_tuples_and_sets_keep_their_kind() {
    assert_eq!(
        coerce_str("(1, 'a')", &FieldType::tuple(vec![FieldType::int(), FieldType::string()])),
        FieldValue::Tuple(vec![FieldValue::Int(1), FieldValue::from("a")])
    );
    assert_eq!(
        coerce_str("{3, 1, 3}", &FieldType::set(FieldType::int())),
        FieldValue::Set(vec![FieldValue::Int(3), FieldValue::Int(1)])
    );
    assert_eq!(
        coerce_str("set()", &FieldType::set(FieldType::int())),
        FieldValue::Set(vec![])
    );
}

#[test_log::test]
fn test_injection_is_not_evaluated() {
    let target = FieldType::int();
    for raw in [
        "__import__('os').system('true')",
        "(lambda: 1)()",
        "1 if True else 2",
        "[x for x in range(3)]",
        "open('/etc/passwd')",
    ] {
        let (value, path) = coerce_explained(FieldValue::from(raw), &target);
        assert_eq!(value, FieldValue::from(raw));
        assert_eq!(path, CoercionPath::Fallback);
    }
}

#[test_log::test]
fn test_coerce_is_idempotent() {
    let cases = [
        ("42", FieldType::int()),
        ("['a']", FieldType::string().as_list()),
        ("None", FieldType::bool().as_optional()),
        ("hello", FieldType::string()),
        ("nope", FieldType::float()),
    ];
    for (raw, target) in cases {
        let once = coerce(FieldValue::from(raw), &target);
        let twice = coerce(once.clone(), &target);
        assert_eq!(once, twice, "{:?} as {}", raw, target);
    }
}

#[test_log::test]
fn test_string_types_are_identity() {
    let targets = [
        FieldType::string(),
        FieldType::string().as_optional(),
        FieldType::union(vec![FieldType::float(), FieldType::string()]),
    ];
    for target in &targets {
        for raw in ["", "0", "1.5", "True", "[1]", "{'a': 1}", "'x'", "  spaced  "] {
            assert_eq!(coerce_str(raw, target), FieldValue::from(raw));
        }
    }
}
