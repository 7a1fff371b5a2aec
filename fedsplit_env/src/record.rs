//! Comma-separated record splitting shared by the trace and manifest readers.
//!
//! Fields follow the usual quoting rules: a field that opens with `"` runs
//! until the matching closing quote, commas inside it are literal, and `""`
//! inside a quoted field stands for one `"`. Records do not span lines.

/// Splits one line into its fields.
///
/// An empty line is a record with no fields, not a record with one empty
/// field.
pub fn split_record(line: &str) -> Vec<String> {
    if line.is_empty() {
        return Vec::new();
    }
    
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut at_start = true;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_start => {
                in_quotes = true;
                at_start = false;
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
                at_start = true;
            }
            _ => {
                field.push(c);
                at_start = false;
            }
        }
    }
    fields.push(field);
    
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_plain_fields() {
        assert_eq!(split_record("A,f1,cat,3"), vec!["A", "f1", "cat", "3"]);
        assert_eq!(split_record("A,"), vec!["A", ""]);
        assert_eq!(split_record("lonely"), vec!["lonely"]);
    }
    
    #[test]
    fn test_empty_line_has_no_fields() {
        assert!(split_record("").is_empty());
    }
    
    #[test]
    fn test_quoted_comma_is_literal() {
        assert_eq!(split_record("A,\"img/a,b.png\",cat"), vec!["A", "img/a,b.png", "cat"]);
    }
    
    #[test]
    fn test_doubled_quote_escape() {
        assert_eq!(split_record("\"say \"\"hi\"\"\",x"), vec!["say \"hi\"", "x"]);
        assert_eq!(split_record("\"\",x"), vec!["", "x"]);
    }
    
    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        assert_eq!(split_record("a\"b,c"), vec!["a\"b", "c"]);
    }
}
