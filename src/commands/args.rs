//! Positional argument binding for command invocations.
//!
//! A command declares an ordered parameter list; the router hands the
//! binder the tokens left over after command resolution. Binding is
//! all-or-nothing: either every declared parameter receives a coerced
//! value or the invocation fails without running the handler.

use std::fmt;

use thiserror::Error;

/// Declared kind of a command parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Any token, kept verbatim.
    Text,
    /// A signed integer.
    Integer,
    /// A floating-point number.
    Decimal,
}

impl ParamKind {
    /// Stable kind name used in coercion errors.
    pub fn expected(self) -> &'static str {
        match self {
            ParamKind::Text => "text",
            ParamKind::Integer => "integer",
            ParamKind::Decimal => "decimal",
        }
    }

    fn coerce(self, value: &str) -> Result<Arg, BindError> {
        match self {
            ParamKind::Text => Ok(Arg::Text(value.to_string())),
            ParamKind::Integer => value.parse::<i64>().map(Arg::Integer).map_err(|_| {
                BindError::Coerce {
                    value: value.to_string(),
                    expected: self.expected(),
                }
            }),
            ParamKind::Decimal => value.parse::<f64>().map(Arg::Decimal).map_err(|_| {
                BindError::Coerce {
                    value: value.to_string(),
                    expected: self.expected(),
                }
            }),
        }
    }
}

/// One declared parameter of a command.
#[derive(Clone, Debug)]
pub struct Param {
    name: String,
    kind: ParamKind,
}

impl Param {
    /// Declare a parameter.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// The declared name, used in arity errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared kind.
    pub fn kind(&self) -> ParamKind {
        self.kind
    }
}

/// A bound argument value, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg {
    /// A verbatim token (or the joined overflow tail).
    Text(String),
    /// A coerced integer.
    Integer(i64),
    /// A coerced floating-point number.
    Decimal(f64),
}

impl Arg {
    /// The text value, if this argument was declared [`ParamKind::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The integer value, if this argument was declared [`ParamKind::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Arg::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// The decimal value, if this argument was declared [`ParamKind::Decimal`].
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Arg::Decimal(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(value) => f.write_str(value),
            Arg::Integer(value) => write!(f, "{value}"),
            Arg::Decimal(value) => write!(f, "{value}"),
        }
    }
}

/// Why an invocation failed to bind.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BindError {
    /// Fewer tokens than declared parameters.
    #[error("not enough arguments for {command}, required: {}", .required.join(", "))]
    Arity {
        /// The resolved command name.
        command: String,
        /// Every declared parameter name, in order.
        required: Vec<String>,
    },

    /// A token did not parse as its declared kind.
    #[error("invalid value {value:?}, {expected} expected")]
    Coerce {
        /// The offending token (joined overflow included).
        value: String,
        /// The declared kind name.
        expected: &'static str,
    },
}

/// Bind `tokens` to `params`, in order.
///
/// With more tokens than parameters, the surplus is folded into the final
/// parameter: the tail is rejoined with single spaces and coerced as one
/// value. With zero declared parameters any tokens are discarded. With
/// fewer tokens than parameters the invocation fails before any coercion
/// runs.
pub fn bind(command: &str, params: &[Param], tokens: &[&str]) -> Result<Vec<Arg>, BindError> {
    if tokens.len() < params.len() {
        return Err(BindError::Arity {
            command: command.to_string(),
            required: params.iter().map(|p| p.name().to_string()).collect(),
        });
    }
    if params.is_empty() {
        return Ok(Vec::new());
    }

    let last = params.len() - 1;
    let mut args = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        let value = if i == last {
            tokens[last..].join(" ")
        } else {
            tokens[i].to_string()
        };
        args.push(param.kind().coerce(&value)?);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(decls: &[(&str, ParamKind)]) -> Vec<Param> {
        decls.iter().map(|(name, kind)| Param::new(*name, *kind)).collect()
    }

    #[test]
    fn test_exact_arity_binds_in_order() {
        let params = params(&[("user", ParamKind::Text), ("count", ParamKind::Integer)]);
        let args = bind("timeout", &params, &["ronni", "30"]).unwrap();
        assert_eq!(args, vec![Arg::Text("ronni".to_string()), Arg::Integer(30)]);
    }

    #[test]
    fn test_missing_tokens_report_every_parameter_name() {
        let params = params(&[("user", ParamKind::Text), ("count", ParamKind::Integer)]);
        let err = bind("timeout", &params, &["ronni"]).unwrap_err();
        assert_eq!(
            err,
            BindError::Arity {
                command: "timeout".to_string(),
                required: vec!["user".to_string(), "count".to_string()],
            }
        );
        assert_eq!(
            err.to_string(),
            "not enough arguments for timeout, required: user, count"
        );
    }

    #[test]
    fn test_overflow_joins_into_the_final_parameter() {
        let params = params(&[("user", ParamKind::Text), ("reason", ParamKind::Text)]);
        let args = bind("ban", &params, &["ronni", "spamming", "chat", "links"]).unwrap();
        assert_eq!(
            args,
            vec![
                Arg::Text("ronni".to_string()),
                Arg::Text("spamming chat links".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_parameter_swallows_everything() {
        let params = params(&[("query", ParamKind::Text)]);
        let args = bind("song", &params, &["never", "gonna", "give"]).unwrap();
        assert_eq!(args, vec![Arg::Text("never gonna give".to_string())]);
    }

    #[test]
    fn test_zero_parameters_discard_extra_tokens() {
        let args = bind("ping", &[], &["these", "are", "ignored"]).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_integer_coercion() {
        let params = params(&[("sides", ParamKind::Integer)]);
        assert_eq!(bind("roll", &params, &["20"]).unwrap(), vec![Arg::Integer(20)]);
        assert_eq!(bind("roll", &params, &["-3"]).unwrap(), vec![Arg::Integer(-3)]);

        let err = bind("roll", &params, &["abc"]).unwrap_err();
        assert_eq!(
            err,
            BindError::Coerce {
                value: "abc".to_string(),
                expected: "integer",
            }
        );
    }

    #[test]
    fn test_decimal_coercion() {
        let params = params(&[("volume", ParamKind::Decimal)]);
        assert_eq!(
            bind("volume", &params, &["0.5"]).unwrap(),
            vec![Arg::Decimal(0.5)]
        );
        let err = bind("volume", &params, &["loud"]).unwrap_err();
        assert_eq!(
            err,
            BindError::Coerce {
                value: "loud".to_string(),
                expected: "decimal",
            }
        );
    }

    #[test]
    fn test_overflow_is_joined_before_coercion() {
        // The folded tail "4 2" is one value as far as the binder is
        // concerned, so a non-text final parameter rejects it.
        let params = params(&[("sides", ParamKind::Integer)]);
        let err = bind("roll", &params, &["4", "2"]).unwrap_err();
        assert_eq!(
            err,
            BindError::Coerce {
                value: "4 2".to_string(),
                expected: "integer",
            }
        );
    }

    #[test]
    fn test_argument_accessors() {
        assert_eq!(Arg::Text("hi".to_string()).as_text(), Some("hi"));
        assert_eq!(Arg::Integer(7).as_integer(), Some(7));
        assert_eq!(Arg::Decimal(1.5).as_decimal(), Some(1.5));
        assert_eq!(Arg::Integer(7).as_text(), None);
        assert_eq!(Arg::Text("hi".to_string()).to_string(), "hi");
        assert_eq!(Arg::Integer(7).to_string(), "7");
    }
}
