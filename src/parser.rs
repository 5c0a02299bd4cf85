use crate::error::{Result, ShellError};

/// Largest number of tokens accepted on one line.
pub const MAXARGS: usize = 63;

/// Splits a line into an argument vector.
///
/// Returns `Ok(None)` for a blank line. The first token is the program or
/// built-in name.
pub fn parse_line(line: &str) -> Result<Option<Vec<String>>> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    if tokens.len() > MAXARGS {
        return Err(ShellError::Parse(format!(
            "too many arguments (max {})",
            MAXARGS
        )));
    }
    Ok(Some(tokens))
}

/// Splits on spaces, tabs and newlines. A run of characters wrapped in single
/// or double quotes becomes part of one token, quotes removed.
fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if is_separator(ch) {
            chars.next();
            continue;
        }
        let mut token = String::new();
        while let Some(&c) = chars.peek() {
            if is_separator(c) {
                break;
            }
            chars.next();
            if c == '"' || c == '\'' {
                let quote = c;
                loop {
                    match chars.next() {
                        Some(q) if q == quote => break,
                        Some(inner) => token.push(inner),
                        None => {
                            return Err(ShellError::Parse(format!("unterminated {} quote", quote)))
                        }
                    }
                }
            } else {
                token.push(c);
            }
        }
        tokens.push(token);
    }
    Ok(tokens)
}

fn is_separator(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_simple() {
        let tokens = tokenize("ls -l").unwrap();
        assert_eq!(tokens, vec!["ls", "-l"]);
    }

    #[test]
    fn test_tokenize_tabs_and_newline() {
        let tokens = tokenize("sleep\t 1 \n").unwrap();
        assert_eq!(tokens, vec!["sleep", "1"]);
    }

    #[test]
    fn test_tokenize_quotes() {
        let tokens = tokenize("echo \"hello world\" 'a b'c").unwrap();
        assert_eq!(tokens, vec!["echo", "hello world", "a bc"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(tokenize("echo 'oops"), Err(ShellError::Parse(_))));
    }

    #[test]
    fn test_parse_blank_line() {
        assert!(parse_line("   \n").unwrap().is_none());
        assert!(parse_line("").unwrap().is_none());
    }

    #[test]
    fn test_parse_bg_line() {
        let argv = parse_line("bg sleep 1\n").unwrap().unwrap();
        assert_eq!(argv, vec!["bg", "sleep", "1"]);
    }

    #[test]
    fn test_too_many_arguments() {
        let line = vec!["x"; MAXARGS + 1].join(" ");
        assert!(matches!(parse_line(&line), Err(ShellError::Parse(_))));
        let line = vec!["x"; MAXARGS].join(" ");
        assert_eq!(parse_line(&line).unwrap().unwrap().len(), MAXARGS);
    }
}
