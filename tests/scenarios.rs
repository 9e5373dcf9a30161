//! End-to-end scenarios against the public `run` entry point.

use gibberish_vm::VmError;

fn run(source: &[u8]) -> Result<String, VmError> {
    let mut out = Vec::new();
    gibberish_vm::run(source, std::io::empty(), &mut out, false)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn adds_two_numbers() {
    assert_eq!(run(b"e1 1 a o").unwrap(), "2\n");
}

#[test]
fn pushes_and_prints_a_string() {
    assert_eq!(run(b"e[hello] o").unwrap(), "hello\n");
}

#[test]
fn subtraction_pops_b_then_a() {
    assert_eq!(run(b"e 5 2 s o").unwrap(), "3\n");
}

#[test]
fn division_output_and_division_by_zero() {
    assert_eq!(run(b"e 4 2 d o").unwrap(), "2\n");
    assert!(run(b"e 4 0 d").is_err());
}

#[test]
fn strlen_counts_bytes() {
    assert_eq!(run(b"e[abc] y o").unwrap(), "3\n");
}

#[test]
fn exec_crosses_instruction_sets() {
    assert_eq!(run(b"e[code: ]q f[1 1 a]c e o").unwrap(), "code: 1\n");
}

#[test]
fn quit_is_not_reported_as_a_runtime_error() {
    let err = run(b"g q").unwrap_err();
    assert!(err.is_quit());
}

#[test]
fn bracket_round_trip_preserves_nested_groups() {
    assert_eq!(run(b"e[a[b]c] o").unwrap(), "a[b]c\n");
}

#[test]
fn unterminated_bracket_is_a_parse_error() {
    let err = run(b"e[abc").unwrap_err();
    assert_eq!(err.category(), "Parse error");
}

#[test]
fn stray_closing_bracket_is_a_parse_error() {
    let err = run(b"e]").unwrap_err();
    assert_eq!(err.category(), "Parse error");
}
