//! Tests for placeholder counting

use super::*;

#[test]
fn test_count_update_template() {
    assert_eq!(count_placeholders("update user set name=? where id=?"), 2);
}

#[test]
fn test_count_insert_and_delete_templates() {
    assert_eq!(count_placeholders("insert into user(name) values (?)"), 1);
    assert_eq!(count_placeholders("delete from user where id=?"), 1);
}

#[test]
fn test_count_no_placeholders() {
    assert_eq!(count_placeholders("select * from user"), 0);
    assert_eq!(count_placeholders(""), 0);
}

#[test]
fn test_count_ignores_string_literals() {
    assert_eq!(
        count_placeholders("update user set name='who?' where id=?"),
        1
    );
    assert_eq!(count_placeholders("select 'it''s ?' , ?"), 1);
}

#[test]
fn test_count_ignores_quoted_identifiers() {
    assert_eq!(count_placeholders(r#"select "odd?col", `x?` from t where a=?"#), 1);
}

#[test]
fn test_count_ignores_bracketed_identifiers() {
    assert_eq!(count_placeholders("update t set [a?b] = ? where id = ?"), 2);
    assert_eq!(count_placeholders("select [odd?col], 'a?' from [t?] where a=?"), 1);
}

#[test]
fn test_count_ignores_comments() {
    let sql = "update t set a=? -- why?\n where b=? /* and ? here */";
    assert_eq!(count_placeholders(sql), 2);
}

#[test]
fn test_count_unterminated_literal() {
    assert_eq!(count_placeholders("select ? , 'open ?"), 1);
}
