use crate::coord::bridge::server::parse_command;

#[test]
fn accepts_the_canonical_command_shape() {
    assert_eq!(parse_command("ID=1;DATA=2"), Some((1, 2)));
    assert_eq!(parse_command("ID=42;DATA=0"), Some((42, 0)));
}

#[test]
fn tolerates_wire_padding() {
    assert_eq!(parse_command("ID=1;DATA=3\n"), Some((1, 3)));
    assert_eq!(parse_command("ID=1;DATA=3\r\n"), Some((1, 3)));
    assert_eq!(parse_command("ID=1;DATA=3\0\0"), Some((1, 3)));
    assert_eq!(parse_command("  ID=7;DATA=1  "), Some((7, 1)));
}

#[test]
fn negative_values_parse_but_stay_signed() {
    assert_eq!(parse_command("ID=-1;DATA=-5"), Some((-1, -5)));
}

#[test]
fn rejects_malformed_lines() {
    assert_eq!(parse_command(""), None);
    assert_eq!(parse_command("hello"), None);
    assert_eq!(parse_command("ID=1"), None);
    assert_eq!(parse_command("ID=1;DATA="), None);
    assert_eq!(parse_command("ID=;DATA=2"), None);
    assert_eq!(parse_command("id=1;data=2"), None);
    assert_eq!(parse_command("DATA=2;ID=1"), None);
    assert_eq!(parse_command("ID=x;DATA=2"), None);
}
