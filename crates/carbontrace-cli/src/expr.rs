//! Parsing of filter expressions typed on the command line or in the REPL.
//!
//! An expression is `<field> <operator> <value>`; a chain joins expressions
//! with `and` / `or`. Values spanning several words are joined with single
//! spaces, or can be quoted with `"`. A quoted `and` / `or` is a value, never
//! a separator.

use crate::error::{CliError, Result};
use crate::validation;
use carbontrace_filter::{ConfigurationError, Criterion, Field, Mode};
use std::fmt;

/// One word of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Text with quotes removed
    pub text: String,
    /// Whether any part of the word was quoted
    pub quoted: bool,
}

impl Token {
    /// An unquoted word.
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    /// The logic keyword this token spells, if it is an unquoted `and` / `or`.
    pub fn mode(&self) -> Option<Mode> {
        if self.quoted {
            None
        } else {
            Mode::parse(&self.text)
        }
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Split a line into words, keeping double-quoted text together.
pub fn tokenize(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut current = Token::word(String::new());
    let mut in_quotes = false;
    let mut pending = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.quoted = true;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::replace(&mut current, Token::word(String::new())));
                    pending = false;
                }
            }
            c => {
                current.text.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err(CliError::InvalidInput("Unterminated quote".to_string()));
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Tokenize command-line arguments one by one.
///
/// The shell has already removed its own quoting, so only quotes that reach
/// the program (`'"or"'`) mark a token as quoted.
pub fn tokenize_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for arg in args {
        tokens.extend(tokenize(arg.as_ref())?);
    }
    Ok(tokens)
}

/// Build a criterion from `<field> <operator> <value...>`.
pub fn parse_criterion<S: AsRef<str>>(tokens: &[S]) -> Result<Criterion> {
    if tokens.len() < 3 {
        return Err(CliError::InvalidInput(
            "Expected <field> <operator> <value>".to_string(),
        ));
    }

    let field_name = tokens[0].as_ref();
    let field = Field::parse(field_name)
        .ok_or_else(|| ConfigurationError::UnknownField(field_name.to_string()))?;

    let raw = tokens[2..]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    let value = validation::criterion_value(field, &raw)?;

    Ok(Criterion::parse(field.as_str(), tokens[1].as_ref(), &value)?)
}

/// Build a whole chain from `<expr> [and|or <expr>]...`.
///
/// The first criterion starts the chain and is returned with [`Mode::Or`].
pub fn parse_chain(tokens: &[Token]) -> Result<Vec<(Mode, Criterion)>> {
    let mut steps = Vec::new();
    let mut mode = Mode::Or;
    let mut group: Vec<&str> = Vec::new();

    for token in tokens {
        match token.mode() {
            Some(next) => {
                if group.is_empty() {
                    return Err(CliError::InvalidInput(format!(
                        "Missing criterion before {}",
                        next
                    )));
                }
                steps.push((mode, parse_criterion(&group)?));
                group.clear();
                mode = next;
            }
            None => group.push(&token.text),
        }
    }

    if group.is_empty() {
        return Err(CliError::InvalidInput(if steps.is_empty() {
            "Empty filter expression".to_string()
        } else {
            format!("Missing criterion after {}", mode)
        }));
    }
    steps.push((mode, parse_criterion(&group)?));

    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbontrace_filter::{Operator, Value};

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(AsRef::as_ref).collect()
    }

    #[test]
    fn test_tokenize_quotes() {
        let tokens = tokenize(r#"name = "Raw Cotton"  and cf > 3"#).unwrap();
        assert_eq!(texts(&tokens), vec!["name", "=", "Raw Cotton", "and", "cf", ">", "3"]);
        assert!(tokens[2].quoted);
        assert!(!tokens[3].quoted);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        assert!(tokenize(r#"name = "Raw"#).is_err());
    }

    #[test]
    fn test_tokenize_empty_quotes_kept() {
        assert_eq!(texts(&tokenize(r#"a "" b"#).unwrap()), vec!["a", "", "b"]);
    }

    #[test]
    fn test_parse_criterion_joins_value_words() {
        let c = parse_criterion(&["material", "=", "Raw", "Cotton"]).unwrap();
        assert_eq!(c.field(), Field::RawMaterialName);
        assert_eq!(c.value(), &Value::Text("Raw Cotton".to_string()));
    }

    #[test]
    fn test_parse_criterion_unknown_field() {
        let err = parse_criterion(&["colour", "=", "red"]).unwrap_err();
        assert!(matches!(err, CliError::Filter(ConfigurationError::UnknownField(_))));
    }

    #[test]
    fn test_parse_criterion_rejects_bad_value_before_engine() {
        let err = parse_criterion(&["id", "=", "0"]).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_parse_criterion_incompatible_operator() {
        let err = parse_criterion(&["owner", ">", "0x1111111111111111111111111111111111111111"])
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Filter(ConfigurationError::IncompatibleOperator { .. })
        ));
    }

    #[test]
    fn test_parse_chain() {
        let tokens = tokenize("cf >= 80 AND supplier = 0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa or id = 5")
            .unwrap();
        let steps = parse_chain(&tokens).unwrap();

        let modes: Vec<Mode> = steps.iter().map(|(m, _)| *m).collect();
        assert_eq!(modes, vec![Mode::Or, Mode::And, Mode::Or]);
        assert_eq!(steps[0].1.operator(), Operator::GreaterOrEqual);
        assert_eq!(steps[2].1.field(), Field::ProductId);
    }

    #[test]
    fn test_parse_chain_dangling_mode() {
        let tokens = tokenize("cf > 1 and").unwrap();
        assert!(parse_chain(&tokens).is_err());

        let tokens = tokenize("or cf > 1").unwrap();
        assert!(parse_chain(&tokens).is_err());

        let empty: Vec<Token> = Vec::new();
        assert!(parse_chain(&empty).is_err());
    }

    #[test]
    fn test_parse_chain_quoted_keyword_is_value() {
        let tokens = tokenize(r#"material = "or""#).unwrap();
        let steps = parse_chain(&tokens).unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].1.value(), &Value::Text("or".to_string()));

        let tokens = tokenize(r#"material = "and" or lot = 2"#).unwrap();
        let steps = parse_chain(&tokens).unwrap();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].0, Mode::Or);
    }

    #[test]
    fn test_tokenize_args_keeps_inner_quotes() {
        let tokens = tokenize_args(&["material", "=", r#""or""#]).unwrap();
        assert!(tokens[2].quoted);
        assert_eq!(parse_chain(&tokens).unwrap().len(), 1);

        let tokens = tokenize_args(&["cf", ">", "1", "and", "lot", "=", "2"]).unwrap();
        assert_eq!(parse_chain(&tokens).unwrap().len(), 2);
    }
}
