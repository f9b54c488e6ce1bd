//! Seed-script statement parsing
//!
//! Seed scripts are plain SQL. Statements are split on semicolons outside
//! of string literals and comments; `CREATE DATABASE` statements declare
//! the logical databases of a dataset group.

/// Split SQL content into individual statements.
///
/// Handles single-line (`--`) and block (`/* */`) comments and single-quoted
/// string literals that may contain semicolons. Comment text is dropped.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    let mut chars = sql.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                current.push(ch);
            }
            continue;
        }
        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            }
            continue;
        }
        if !in_string {
            if ch == '-' && chars.peek() == Some(&'-') {
                chars.next();
                in_line_comment = true;
                continue;
            }
            if ch == '/' && chars.peek() == Some(&'*') {
                chars.next();
                in_block_comment = true;
                continue;
            }
            if ch == ';' {
                let trimmed = current.trim();
                if !trimmed.is_empty() {
                    statements.push(trimmed.to_string());
                }
                current.clear();
                continue;
            }
        }
        if ch == '\'' {
            in_string = !in_string;
        }
        current.push(ch);
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
    statements
}

/// Extract the database names a script declares, in declaration order.
///
/// Recognizes `CREATE DATABASE [IF NOT EXISTS] <name>`; the name may be
/// quoted with double quotes or backticks. Duplicates are returned as-is,
/// the caller decides how to treat them.
pub fn declared_databases(sql: &str) -> Vec<String> {
    split_statements(sql)
        .iter()
        .filter_map(|statement| database_name(statement))
        .collect()
}

fn database_name(statement: &str) -> Option<String> {
    let mut words = statement.split_whitespace();
    if !words.next()?.eq_ignore_ascii_case("CREATE") {
        return None;
    }
    if !words.next()?.eq_ignore_ascii_case("DATABASE") {
        return None;
    }
    let mut name = words.next()?;
    if name.eq_ignore_ascii_case("IF") {
        // CREATE DATABASE IF NOT EXISTS <name>
        words.next()?;
        words.next()?;
        name = words.next()?;
    }
    Some(name.trim_matches(['"', '`']).to_string())
}
