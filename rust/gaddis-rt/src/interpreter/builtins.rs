//! Built-in functions.
//!
//! Names are matched case-insensitively and take precedence over user
//! functions of the same name. Arity and argument types are checked at the
//! call site's line.

use gaddis_core::{RuntimeError, Value};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

static INTEGER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+$").expect("integer pattern"));
static REAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("real pattern"));

/// Whether `text` is a valid Integer literal for input validation.
pub(crate) fn matches_integer(text: &str) -> bool {
    INTEGER_PATTERN.is_match(text)
}

pub(crate) fn matches_real(text: &str) -> bool {
    REAL_PATTERN.is_match(text)
}

const NAMES: &[&str] = &[
    "sqrt",
    "round",
    "abs",
    "cos",
    "sin",
    "tan",
    "power",
    "random",
    "tointeger",
    "toreal",
    "stringtointeger",
    "stringtoreal",
    "isinteger",
    "isreal",
    "currencyformat",
    "length",
    "toupper",
    "tolower",
    "append",
    "contains",
    "substring",
];

/// `name` must already be case-folded.
pub fn is_builtin(name: &str) -> bool {
    NAMES.contains(&name)
}

fn arity(name: &str, args: &[Value], expected: usize, line: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::ArgumentCount {
            name: name.to_string(),
            expected,
            found: args.len(),
            line,
        });
    }
    Ok(())
}

fn number(name: &str, args: &[Value], index: usize, line: usize) -> Result<f64, RuntimeError> {
    args[index].as_number().ok_or_else(|| {
        RuntimeError::type_mismatch(
            format!(
                "{}: argument {} must be a number, not a {}",
                name,
                index + 1,
                args[index].type_name()
            ),
            line,
        )
    })
}

fn text<'v>(
    name: &str,
    args: &'v [Value],
    index: usize,
    line: usize,
) -> Result<&'v str, RuntimeError> {
    args[index].as_string().ok_or_else(|| {
        RuntimeError::type_mismatch(
            format!(
                "{}: argument {} must be a String, not a {}",
                name,
                index + 1,
                args[index].type_name()
            ),
            line,
        )
    })
}

fn string_index(name: &str, args: &[Value], index: usize, line: usize) -> Result<i64, RuntimeError> {
    let n = number(name, args, index, line)?;
    if n.fract() != 0.0 {
        return Err(RuntimeError::type_mismatch(
            format!("{}: argument {} must be an Integer", name, index + 1),
            line,
        ));
    }
    Ok(n as i64)
}

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    loop {
        if n < 1000 {
            groups.push(n.to_string());
            break;
        }
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.reverse();
    groups.join(",")
}

/// Dispatch a built-in call. `name` must already be case-folded; unknown
/// names report an undefined function at the call line.
pub fn call(name: &str, args: &[Value], line: usize) -> Result<Value, RuntimeError> {
    match name {
        "sqrt" => {
            arity(name, args, 1, line)?;
            Ok(Value::Real(number(name, args, 0, line)?.sqrt()))
        }
        // Rounds halves away from zero.
        "round" => {
            arity(name, args, 1, line)?;
            Ok(Value::Integer(number(name, args, 0, line)?.round() as i64))
        }
        "abs" => {
            arity(name, args, 1, line)?;
            match &args[0] {
                Value::Integer(n) => Ok(Value::Integer(n.wrapping_abs())),
                _ => Ok(Value::Real(number(name, args, 0, line)?.abs())),
            }
        }
        "cos" => {
            arity(name, args, 1, line)?;
            Ok(Value::Real(number(name, args, 0, line)?.cos()))
        }
        "sin" => {
            arity(name, args, 1, line)?;
            Ok(Value::Real(number(name, args, 0, line)?.sin()))
        }
        "tan" => {
            arity(name, args, 1, line)?;
            Ok(Value::Real(number(name, args, 0, line)?.tan()))
        }
        "power" => {
            arity(name, args, 2, line)?;
            let base = number(name, args, 0, line)?;
            let exponent = number(name, args, 1, line)?;
            Ok(Value::Real(base.powf(exponent)))
        }
        "random" => {
            arity(name, args, 2, line)?;
            let min = number(name, args, 0, line)?.trunc() as i64;
            let max = number(name, args, 1, line)?.trunc() as i64;
            if min > max {
                return Err(RuntimeError::type_mismatch(
                    "random: min must not exceed max",
                    line,
                ));
            }
            Ok(Value::Integer(rand::thread_rng().gen_range(min..=max)))
        }
        "tointeger" => {
            arity(name, args, 1, line)?;
            Ok(Value::Integer(number(name, args, 0, line)?.trunc() as i64))
        }
        "toreal" => {
            arity(name, args, 1, line)?;
            Ok(Value::Real(number(name, args, 0, line)?))
        }
        "stringtointeger" => {
            arity(name, args, 1, line)?;
            let s = text(name, args, 0, line)?.trim();
            if !matches_integer(s) {
                return Err(RuntimeError::type_mismatch(
                    format!("stringToInteger: '{}' is not a valid Integer", s),
                    line,
                ));
            }
            s.parse::<i64>().map(Value::Integer).map_err(|_| {
                RuntimeError::type_mismatch(
                    format!("stringToInteger: '{}' is out of range", s),
                    line,
                )
            })
        }
        "stringtoreal" => {
            arity(name, args, 1, line)?;
            let s = text(name, args, 0, line)?.trim();
            if !matches_real(s) {
                return Err(RuntimeError::type_mismatch(
                    format!("stringToReal: '{}' is not a valid Real", s),
                    line,
                ));
            }
            s.parse::<f64>().map(Value::Real).map_err(|_| {
                RuntimeError::type_mismatch(format!("stringToReal: '{}' is out of range", s), line)
            })
        }
        "isinteger" => {
            arity(name, args, 1, line)?;
            let s = text(name, args, 0, line)?;
            Ok(Value::from_bool(matches_integer(s.trim())))
        }
        "isreal" => {
            arity(name, args, 1, line)?;
            let s = text(name, args, 0, line)?;
            Ok(Value::from_bool(matches_real(s.trim())))
        }
        "currencyformat" => {
            arity(name, args, 1, line)?;
            let n = number(name, args, 0, line)?;
            let cents = (n.abs() * 100.0).round() as u64;
            let sign = if n < 0.0 && cents > 0 { "-" } else { "" };
            Ok(Value::String(format!(
                "{}${}.{:02}",
                sign,
                group_thousands(cents / 100),
                cents % 100
            )))
        }
        "length" => {
            arity(name, args, 1, line)?;
            let s = text(name, args, 0, line)?;
            Ok(Value::Integer(s.chars().count() as i64))
        }
        "toupper" => {
            arity(name, args, 1, line)?;
            Ok(Value::String(text(name, args, 0, line)?.to_uppercase()))
        }
        "tolower" => {
            arity(name, args, 1, line)?;
            Ok(Value::String(text(name, args, 0, line)?.to_lowercase()))
        }
        "append" => {
            arity(name, args, 2, line)?;
            let a = text(name, args, 0, line)?;
            let b = text(name, args, 1, line)?;
            Ok(Value::String(format!("{}{}", a, b)))
        }
        "contains" => {
            arity(name, args, 2, line)?;
            let haystack = text(name, args, 0, line)?;
            let needle = text(name, args, 1, line)?;
            Ok(Value::from_bool(haystack.contains(needle)))
        }
        "substring" => {
            if args.len() != 2 && args.len() != 3 {
                return Err(RuntimeError::ArgumentCount {
                    name: name.to_string(),
                    expected: 2,
                    found: args.len(),
                    line,
                });
            }
            let chars: Vec<char> = text(name, args, 0, line)?.chars().collect();
            let start = string_index(name, args, 1, line)?;
            let end = if args.len() == 3 {
                string_index(name, args, 2, line)?
            } else {
                chars.len() as i64
            };
            if start > end {
                return Err(RuntimeError::SubstringBounds { line });
            }
            let start = start.max(0) as usize;
            let end = (end.max(0) as usize).min(chars.len());
            let slice = if start >= chars.len() {
                String::new()
            } else {
                chars[start..end.max(start)].iter().collect()
            };
            Ok(Value::String(slice))
        }
        other => Err(RuntimeError::UndeclaredFunction {
            name: other.to_string(),
            line,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_is_half_away_from_zero() {
        assert_eq!(call("round", &[Value::Real(2.5)], 1), Ok(Value::Integer(3)));
        assert_eq!(
            call("round", &[Value::Real(-2.5)], 1),
            Ok(Value::Integer(-3))
        );
    }

    #[test]
    fn to_integer_truncates_toward_zero() {
        assert_eq!(
            call("tointeger", &[Value::Real(2.9)], 1),
            Ok(Value::Integer(2))
        );
        assert_eq!(
            call("tointeger", &[Value::Real(-2.9)], 1),
            Ok(Value::Integer(-2))
        );
    }

    #[test]
    fn abs_preserves_integer() {
        assert_eq!(call("abs", &[Value::Integer(-4)], 1), Ok(Value::Integer(4)));
        assert_eq!(call("abs", &[Value::Real(-1.5)], 1), Ok(Value::Real(1.5)));
    }

    #[test]
    fn random_stays_within_inclusive_bounds() {
        for _ in 0..50 {
            let Ok(Value::Integer(n)) = call("random", &[Value::Integer(1), Value::Integer(6)], 1)
            else {
                panic!("random should produce an Integer");
            };
            assert!((1..=6).contains(&n));
        }
    }

    #[test]
    fn string_parsing_accepts_trimmed_numbers() {
        assert_eq!(
            call("stringtointeger", &[Value::String(" 42 ".into())], 1),
            Ok(Value::Integer(42))
        );
        assert_eq!(
            call("stringtoreal", &[Value::String("2.5".into())], 1),
            Ok(Value::Real(2.5))
        );
        assert!(call("stringtointeger", &[Value::String("4x".into())], 1).is_err());
    }

    #[test]
    fn is_integer_and_is_real() {
        assert_eq!(
            call("isinteger", &[Value::String(" -3 ".into())], 1),
            Ok(Value::Integer(1))
        );
        assert_eq!(
            call("isinteger", &[Value::String("3.5".into())], 1),
            Ok(Value::Integer(0))
        );
        assert_eq!(
            call("isreal", &[Value::String("3.5".into())], 1),
            Ok(Value::Integer(1))
        );
    }

    #[test]
    fn currency_format_groups_thousands() {
        assert_eq!(
            call("currencyformat", &[Value::Real(1234.5)], 1),
            Ok(Value::String("$1,234.50".into()))
        );
        assert_eq!(
            call("currencyformat", &[Value::Integer(1000000)], 1),
            Ok(Value::String("$1,000,000.00".into()))
        );
        assert_eq!(
            call("currencyformat", &[Value::Real(-9.99)], 1),
            Ok(Value::String("-$9.99".into()))
        );
    }

    #[test]
    fn substring_forms() {
        let s = Value::String("pseudocode".into());
        assert_eq!(
            call("substring", &[s.clone(), Value::Integer(6)], 1),
            Ok(Value::String("code".into()))
        );
        assert_eq!(
            call(
                "substring",
                &[s.clone(), Value::Integer(0), Value::Integer(6)],
                1
            ),
            Ok(Value::String("pseudo".into()))
        );
        assert_eq!(
            call("substring", &[s, Value::Integer(4), Value::Integer(2)], 1),
            Err(RuntimeError::SubstringBounds { line: 1 })
        );
    }

    #[test]
    fn arity_errors_name_the_builtin() {
        let err = call("sqrt", &[], 3).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::ArgumentCount {
                name: "sqrt".into(),
                expected: 1,
                found: 0,
                line: 3
            }
        );
    }

    #[test]
    fn string_helpers() {
        assert_eq!(
            call("toupper", &[Value::String("abc".into())], 1),
            Ok(Value::String("ABC".into()))
        );
        assert_eq!(
            call(
                "append",
                &[Value::String("a".into()), Value::String("b".into())],
                1
            ),
            Ok(Value::String("ab".into()))
        );
        assert_eq!(
            call(
                "contains",
                &[Value::String("seahorse".into()), Value::String("horse".into())],
                1
            ),
            Ok(Value::Integer(1))
        );
        assert_eq!(
            call("length", &[Value::String("héllo".into())], 1),
            Ok(Value::Integer(5))
        );
    }
}
