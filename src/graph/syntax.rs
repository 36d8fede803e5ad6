use crate::error::{KvolveError, Result};
use crate::graph::dot::{FOOTER, HEADER};

/// Structural check of exported graph text.
///
/// Accepts exactly what the exporter writes: the header line, any number of
/// node or edge statements (one per line), and the footer line. Statements
/// must start with a quoted id, keep quotes and brackets balanced, and end
/// with an attribute list.
pub fn check_syntax(text: &str) -> Result<()> {
    let lines: Vec<&str> = text.split('\n').collect();

    if lines.len() < 2 {
        return Err(malformed(0, "expected at least a header and a footer"));
    }
    if lines[0] != HEADER {
        return Err(malformed(1, "missing `digraph {rankdir=LR` header"));
    }
    if lines[lines.len() - 1] != FOOTER {
        return Err(malformed(lines.len(), "missing closing `}`"));
    }

    for (offset, line) in lines[1..lines.len() - 1].iter().enumerate() {
        check_statement(line).map_err(|reason| malformed(offset + 2, reason))?;
    }
    Ok(())
}

fn check_statement(line: &str) -> std::result::Result<(), &'static str> {
    if !line.starts_with('"') {
        return Err("statement must start with a quoted id");
    }
    if !line.ends_with(']') {
        return Err("statement must end with an attribute list");
    }

    let mut in_quote = false;
    let mut escaped = false;
    let mut depth: i32 = 0;
    let mut lists = 0;

    for c in line.chars() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '[' => {
                depth += 1;
                lists += 1;
            }
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return Err("unbalanced `]`");
                }
            }
            '{' | '}' | ';' => return Err("unexpected character outside quotes"),
            _ => {}
        }
    }

    if in_quote {
        return Err("unterminated string");
    }
    if depth != 0 {
        return Err("unbalanced `[`");
    }
    if lists != 1 {
        return Err("expected exactly one attribute list");
    }
    Ok(())
}

fn malformed(line: usize, reason: &str) -> KvolveError {
    KvolveError::MalformedGraph(format!("line {}: {}", line, reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_valid() {
        assert!(check_syntax("digraph {rankdir=LR\n}").is_ok());
    }

    #[test]
    fn test_statements_are_valid() {
        let text = "digraph {rankdir=LR\n\
                    \"1\" [label=\"0.00\", color=green]\n\
                    \"2\" [label=\"0.31\\n0.58\", color=blue]\n\
                    \"1\" -> \"2\" [label=\"0.71\"]\n\
                    }";
        assert!(check_syntax(text).is_ok());
    }

    #[test]
    fn test_missing_footer_is_rejected() {
        let err = check_syntax("digraph {rankdir=LR\n\"1\" [label=\"0.00\", color=green]");
        assert!(matches!(err, Err(KvolveError::MalformedGraph(_))));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        assert!(check_syntax("graph {\n}").is_err());
        assert!(check_syntax("").is_err());
    }

    #[test]
    fn test_unbalanced_statement_is_rejected() {
        assert!(check_syntax("digraph {rankdir=LR\n\"1\" [label=\"0.00\", color=green\n}").is_err());
        assert!(check_syntax("digraph {rankdir=LR\n\"1 [label=\"0.00\"]\n}").is_err());
        assert!(check_syntax("digraph {rankdir=LR\n\"1\" [a] [b]\n}").is_err());
    }
}
