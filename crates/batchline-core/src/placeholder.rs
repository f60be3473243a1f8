//! Positional placeholder counting for statement templates

#[cfg(test)]
mod tests;

/// Count the `?` placeholders in a SQL template.
///
/// Question marks inside string literals, quoted or `[bracketed]`
/// identifiers and comments are not placeholders. This is a lexer, not a
/// parser: it does not validate the statement.
pub fn count_placeholders(sql: &str) -> usize {
    let chars: Vec<char> = sql.chars().collect();
    let len = chars.len();
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut in_line_comment = false;
    let mut in_block_comment = false;
    let mut i = 0;

    while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }

        if in_block_comment {
            if c == '*' && next == Some('/') {
                in_block_comment = false;
                i += 2;
                continue;
            }
            i += 1;
            continue;
        }

        if let Some(q) = quote {
            if c == q {
                // Doubled quote is an escaped quote; brackets have no escape
                if q != ']' && next == Some(q) {
                    i += 2;
                    continue;
                }
                quote = None;
            }
            i += 1;
            continue;
        }

        match c {
            '-' if next == Some('-') => {
                in_line_comment = true;
                i += 2;
            }
            '/' if next == Some('*') => {
                in_block_comment = true;
                i += 2;
            }
            '\'' | '"' | '`' => {
                quote = Some(c);
                i += 1;
            }
            '[' => {
                quote = Some(']');
                i += 1;
            }
            '?' => {
                count += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }

    count
}
