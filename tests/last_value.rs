mod common;

use k9::snapshot;
use scrib::types::KindSet;

#[test]
fn single_assignment() {
    snapshot!(common::resolve("a = 1"), "1");
}

#[test]
fn last_assignment_wins() {
    snapshot!(common::resolve("a = 1\nb = 2"), "2");
}

#[test]
fn trailing_reference() {
    snapshot!(common::resolve("beast = \"cow\"\nx = 22\nbeast"), r#""cow""#);
}

#[test]
fn assignment_through_a_variable() {
    snapshot!(common::resolve("f = 4.0\ni = 7\ntarget = f"), "4.0");
}

#[test]
fn integer_only_tracking() {
    snapshot!(
        common::resolve_with("f = 4.0\ni = 7\ntarget = f", KindSet::INTEGER),
        "7"
    );
}

#[test]
fn ambiguous_unpack() {
    snapshot!(
        common::resolve("a = 1\n(b, c) = (2, 3)"),
        "error: multiple assignments changed (b, c); cannot pick one"
    );
}

#[test]
fn empty_input() {
    snapshot!(common::resolve(""), "-");
    snapshot!(common::resolve(" \n \n"), "-");
}

#[test]
fn small_session() {
    snapshot!(
        common::resolve(
            "greeting = \"hello\"
name = \"world\"
message = greeting + \", \" + name
len(message)"
        ),
        "12"
    );
}

#[test]
fn multi_line_construct() {
    snapshot!(
        common::resolve(
            "parts = [
    \"ab\",
    \"cd\",
]
first = min(len(parts), 2)
first"
        ),
        "2"
    );
}

#[test]
fn runtime_error_names_the_statement() {
    snapshot!(
        common::resolve("a = 1\nb = missing"),
        "
error: unknown variable: missing
in statement:
b = missing
"
    );
}
