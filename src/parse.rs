//! Parsing of hand-typed formula text
//!
//! The grammar is the informal one of graphing calculators rather than a
//! programming language: implicit multiplication (`2xy`), juxtaposition by
//! whitespace (`2 x`), functions applied with or without parentheses around
//! a single factor (`sin(x)`, but also `sqrt2`), `^` for powers, and a
//! single optional comparator splitting the text into two sides.
//!
//! [`parse`] resolves names against a caller-supplied vocabulary, so the
//! same text can mean different things in different batches; see
//! [`compile`](crate::compile) for how the vocabulary is assembled.
//!
//! ```
//! # use std::collections::HashSet;
//! # use levelset::parse::{parse, Ast, CompareMode};
//! let vars: HashSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
//! let funcs = HashSet::new();
//! let (ast, mode) = parse("y=sin(x)", &vars, &funcs).unwrap();
//! // comparisons normalize to an expression compared against zero
//! assert_eq!(mode, CompareMode::Eq);
//! assert!(matches!(ast, Ast::Op { name, .. } if name == "-"));
//! ```

use crate::Error;
use std::collections::{HashSet, VecDeque};

/// Function names that are always in the vocabulary
///
/// Includes spelling variants (`√`, `arctan`, `sgn`, `signum`) which are
/// canonicalized during tokenization.
pub(crate) const BUILTIN_FUNCTIONS: &[&str] = &[
    "log", "exp", "sqrt", "pow", "hypot", "sin", "cos", "tan", "asin",
    "acos", "atan", "sinh", "cosh", "tanh", "asinh", "acosh", "atanh",
    "atan2", "√", "abs", "arctan", "min", "max", "floor", "ceil", "round",
    "sgn", "sign", "signum",
];

/// Spelling variants, resolved at tokenization time
///
/// A key is only recognized if it is in the vocabulary: the operator and
/// function keys always are, while `π`-style constant keys must be added by
/// the caller alongside their targets.
pub(crate) const ALIASES: &[(&str, &str)] = &[
    ("**", "^"),
    ("√", "sqrt"),
    ("arctan", "atan"),
    ("π", "pi"),
    ("PI", "pi"),
    ("E", "e"),
    ("th", "theta"),
    ("θ", "theta"),
    ("φ", "phi"),
    ("sgn", "sign"),
    ("signum", "sign"),
];

const OPERATORS: &[&str] = &["+", "-", "*", "/", "^", "**"];
const COMPARERS: &[&str] = &["<", "=", ">", "<=", ">="];

/// Operator sets split in precedence order; everything tighter is handled
/// by the combined function/multiplication/power scan
const OP_LEVELS: [&[&str]; 2] = [&["+", "-"], &["*", "/", " "]];

fn resolve_alias(s: &str) -> &str {
    ALIASES.iter().find(|(k, _)| *k == s).map_or(s, |(_, v)| *v)
}

/// Comparison mode attached to a parsed formula
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CompareMode {
    /// `=`: only the zero set is drawn
    Eq,
    /// `>` or `<`: the strictly-positive side of the normalized expression
    Gt,
    /// `>=` or `<=`: the positive side including the boundary
    Ge,
    /// No comparator: a bare expression
    Unordered,
}

/// Syntax tree of a single formula side
///
/// Operator names are canonical strings (aliases already resolved), with
/// unary negation as the distinguished name `-@`.  Argument counts are not
/// checked here; the compiler rejects e.g. `sin(x, y)` when it maps names
/// onto opcodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Ast {
    /// Numeric literal
    Num(f64),
    /// Variable reference
    Var(String),
    /// Operator or function application
    Op {
        /// Canonical operator name
        name: String,
        /// Argument list, in source order
        args: Vec<Ast>,
    },
}

impl Ast {
    fn op(name: &str, args: Vec<Ast>) -> Self {
        Ast::Op {
            name: name.to_owned(),
            args,
        }
    }
}

/// Parses one formula against the given vocabulary
///
/// `vars` and `funcs` extend the built-in vocabulary; multi-character names
/// match greedily, longest first.  The result is a single expression
/// (comparators are normalized into a subtraction, `>`-family comparators
/// keeping their left side first) plus the [`CompareMode`].
pub fn parse(
    s: &str,
    vars: &HashSet<String>,
    funcs: &HashSet<String>,
) -> Result<(Ast, CompareMode), Error> {
    let chars = parse_paren(s)?;
    let vocab = Vocab::new(vars, funcs);
    let group = tokenize(&chars, &vocab)?;
    let blank = group.is_empty()
        || matches!(group.as_slice(), [Token::Str(s)] if s == " ");
    if blank {
        return Err(Error::EmptyExpression);
    }
    build_root(&group, &vocab)
}

////////////////////////////////////////////////////////////////////////////

/// Raw character tree; parentheses become nested groups
enum CharNode {
    Ch(char),
    Group(Vec<CharNode>),
}

fn parse_paren(input: &str) -> Result<Vec<CharNode>, Error> {
    let mut stack: Vec<Vec<CharNode>> = vec![];
    let mut current = vec![];
    for c in input.chars() {
        match c {
            '(' => stack.push(std::mem::take(&mut current)),
            ')' => {
                let mut parent =
                    stack.pop().ok_or(Error::ParenMismatch)?;
                parent.push(CharNode::Group(std::mem::take(&mut current)));
                current = parent;
            }
            _ => current.push(CharNode::Ch(c)),
        }
    }
    if !stack.is_empty() {
        return Err(Error::ParenMismatch);
    }
    Ok(current)
}

////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Num(f64),
    Str(String),
    Group(Vec<Token>),
}

struct Vocab<'a> {
    tokens: HashSet<&'a str>,
    functions: HashSet<&'a str>,
    /// Longest token, in characters
    max_len: usize,
}

impl<'a> Vocab<'a> {
    fn new(vars: &'a HashSet<String>, funcs: &'a HashSet<String>) -> Self {
        let mut tokens: HashSet<&str> = HashSet::new();
        tokens.extend(BUILTIN_FUNCTIONS);
        tokens.extend(OPERATORS);
        tokens.extend(COMPARERS);
        tokens.insert(",");
        tokens.insert(" ");
        tokens.extend(vars.iter().map(String::as_str));
        tokens.extend(funcs.iter().map(String::as_str));

        let mut functions: HashSet<&str> =
            BUILTIN_FUNCTIONS.iter().copied().collect();
        functions.extend(funcs.iter().map(String::as_str));

        let max_len =
            tokens.iter().map(|t| t.chars().count()).max().unwrap_or(0);
        Vocab {
            tokens,
            functions,
            max_len,
        }
    }

    fn is_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }
}

/// Matches one token at `pattern[i]`, returning it and its length in chars
///
/// Numbers are a digit run with at most one interior `.`; everything else
/// is a longest-prefix match against the vocabulary.
fn match_token(
    pattern: &[char],
    i: usize,
    vocab: &Vocab,
) -> Option<(Token, usize)> {
    if pattern[i].is_ascii_digit() {
        let mut len = 1;
        let mut dots = 0;
        while i + len < pattern.len() {
            let c = pattern[i + len];
            if c.is_ascii_digit() {
            } else if dots == 0 && c == '.' {
                dots += 1;
            } else {
                break;
            }
            len += 1;
        }
        let s: String = pattern[i..i + len].iter().collect();
        let v = s.parse().ok()?;
        return Some((Token::Num(v), len));
    }
    for len in (1..=vocab.max_len).rev() {
        if i + len > pattern.len() {
            continue;
        }
        let s: String = pattern[i..i + len].iter().collect();
        if vocab.tokens.contains(s.as_str()) {
            return Some((Token::Str(resolve_alias(&s).to_owned()), len));
        }
    }
    None
}

fn tokenize(group: &[CharNode], vocab: &Vocab) -> Result<Vec<Token>, Error> {
    // Nested groups are opaque to token matching; they appear as a
    // placeholder that can never be part of a multi-character token.
    let pattern: Vec<char> = group
        .iter()
        .map(|n| match n {
            CharNode::Ch(c) => *c,
            CharNode::Group(_) => '@',
        })
        .collect();
    let mut out: Vec<Token> = vec![];
    let mut i = 0;
    while i < group.len() {
        match &group[i] {
            CharNode::Group(g) => {
                out.push(Token::Group(tokenize(g, vocab)?));
                i += 1;
            }
            CharNode::Ch(' ') => {
                // Whitespace runs collapse to a single separator
                if !matches!(out.last(), Some(Token::Str(s)) if s == " ") {
                    out.push(Token::Str(" ".to_owned()));
                }
                i += 1;
            }
            CharNode::Ch(c) => match match_token(&pattern, i, vocab) {
                Some((tok, len)) => {
                    out.push(tok);
                    i += len;
                }
                None if c.is_alphabetic() => {
                    let run: String = pattern[i..]
                        .iter()
                        .take_while(|c| c.is_alphabetic())
                        .collect();
                    return Err(Error::UnknownIdentifier(run));
                }
                None => {
                    return Err(Error::UnexpectedToken(c.to_string()));
                }
            },
        }
    }
    Ok(out)
}

////////////////////////////////////////////////////////////////////////////

/// A sub-expression, or a comma-separated argument list waiting for a
/// function to consume it
enum Parsed {
    One(Ast),
    Args(Vec<Ast>),
}

fn is_comma(t: &Token) -> bool {
    matches!(t, Token::Str(s) if s == ",")
}

fn build_root(
    group: &[Token],
    vocab: &Vocab,
) -> Result<(Ast, CompareMode), Error> {
    let mut cmp: Option<(usize, &str)> = None;
    for (i, t) in group.iter().enumerate() {
        if let Token::Str(s) = t {
            if COMPARERS.contains(&s.as_str()) {
                cmp = Some((i, s));
                break;
            }
        }
    }
    let Some((idx, cmp)) = cmp else {
        return match build_ast(group, vocab)? {
            Parsed::One(ast) => Ok((ast, CompareMode::Unordered)),
            Parsed::Args(_) => Err(Error::UnexpectedComma),
        };
    };
    let Parsed::One(left) = build_ast(&group[..idx], vocab)? else {
        return Err(Error::UnexpectedComma);
    };
    let Parsed::One(right) = build_ast(&group[idx + 1..], vocab)? else {
        return Err(Error::UnexpectedComma);
    };
    // Normalize so that the kept expression is positive where the
    // comparison holds: a > b becomes a - b, a < b becomes b - a.
    let ast = if cmp.contains('>') {
        Ast::op("-", vec![left, right])
    } else {
        Ast::op("-", vec![right, left])
    };
    let mode = if cmp == "=" {
        CompareMode::Eq
    } else if cmp.contains('=') {
        CompareMode::Ge
    } else {
        CompareMode::Gt
    };
    Ok((ast, mode))
}

fn build_ast(group: &[Token], vocab: &Vocab) -> Result<Parsed, Error> {
    let mut parts = vec![];
    for part in group.split(is_comma) {
        parts.push(split_by_op(part, 0, vocab)?);
    }
    if parts.len() == 1 {
        Ok(Parsed::One(parts.remove(0)))
    } else {
        Ok(Parsed::Args(parts))
    }
}

fn split_by_op(
    group: &[Token],
    level: usize,
    vocab: &Vocab,
) -> Result<Ast, Error> {
    let Some(ops) = OP_LEVELS.get(level) else {
        return build_func_mult_pow(group, vocab);
    };
    let mut groups: Vec<&[Token]> = vec![];
    let mut operators: Vec<&str> = vec![];
    let mut start = 0;
    for (i, t) in group.iter().enumerate() {
        if let Token::Str(s) = t {
            if ops.contains(&s.as_str()) {
                groups.push(&group[start..i]);
                operators.push(s);
                start = i + 1;
            }
        }
    }
    groups.push(&group[start..]);

    let first = groups[0];
    let mut ast = if first.is_empty() {
        None
    } else {
        Some(split_by_op(first, level + 1, vocab)?)
    };
    for (op, rgroup) in operators.iter().zip(&groups[1..]) {
        let right = if rgroup.is_empty() {
            None
        } else {
            Some(split_by_op(rgroup, level + 1, vocab)?)
        };
        let Some(right) = right else {
            // A trailing separator is harmless; a trailing operator is not
            if *op == " " {
                continue;
            }
            return Err(Error::NoRightHandSide((*op).to_owned()));
        };
        ast = Some(match ast.take() {
            None => match *op {
                "-" => Ast::op("-@", vec![right]),
                " " => right,
                _ => return Err(Error::NoLeftHandSide((*op).to_owned())),
            },
            Some(left) => {
                let name = if *op == " " { "*" } else { *op };
                Ast::op(name, vec![left, right])
            }
        });
    }
    ast.ok_or(Error::UnexpectedEmptyGroup)
}

/// One decoded item in the function/multiplication/power scan
enum Value {
    Num(f64),
    Str(String),
    Paren(Ast),
    Args(Vec<Ast>),
}

/// Resolves function application, `^`, unary function chains, and implicit
/// multiplication within one multiplicative run
///
/// The scan runs right to left so that `^` can capture the factor after it
/// before the factor (or function) before it is considered: `2x^2` is
/// `2*(x^2)` and `sin(x)^2` is `(sin(x))^2`.
fn build_func_mult_pow(group: &[Token], vocab: &Vocab) -> Result<Ast, Error> {
    let mut values = Vec::with_capacity(group.len());
    for t in group {
        values.push(match t {
            Token::Num(n) => Value::Num(*n),
            Token::Str(s) => Value::Str(s.clone()),
            Token::Group(g) => match build_ast(g, vocab)? {
                Parsed::One(ast) => Value::Paren(ast),
                Parsed::Args(args) => Value::Args(args),
            },
        });
    }

    let mut mults: VecDeque<Ast> = VecDeque::new();
    let mut concatable = false;
    let mut pow: Option<Ast> = None;
    let mut index = values.len();
    while index > 0 {
        index -= 1;
        let prev_func = index > 0
            && matches!(
                &values[index - 1],
                Value::Str(s) if vocab.is_function(s)
            );
        match &values[index] {
            Value::Args(args) => {
                // An argument list binds to the function right before it
                if !prev_func {
                    return Err(Error::FunctionRequired);
                }
                let Value::Str(name) = &values[index - 1] else {
                    unreachable!()
                };
                index -= 1;
                let fcall = Ast::Op {
                    name: name.clone(),
                    args: args.clone(),
                };
                mults.push_front(match pow.take() {
                    Some(p) => Ast::op("^", vec![fcall, p]),
                    None => fcall,
                });
                concatable = false;
            }
            Value::Paren(inner) => {
                if prev_func {
                    // A pending exponent waits for the function itself
                    mults.push_front(inner.clone());
                } else if let Some(p) = pow.take() {
                    mults.push_front(Ast::op("^", vec![inner.clone(), p]));
                } else {
                    mults.push_front(inner.clone());
                }
                concatable = false;
            }
            Value::Str(s) if s == "^" => {
                let base = mults.pop_front();
                match base {
                    Some(b) if pow.is_none() => pow = Some(b),
                    _ => {
                        return Err(Error::NoRightHandSide("^".to_owned()))
                    }
                }
                concatable = false;
            }
            Value::Str(s) if vocab.is_function(s) => {
                let Some(arg) = mults.pop_front() else {
                    return Err(Error::FunctionArgRequired(s.clone()));
                };
                let fcall = Ast::Op {
                    name: s.clone(),
                    args: vec![arg],
                };
                mults.push_front(match pow.take() {
                    Some(p) => Ast::op("^", vec![fcall, p]),
                    None => fcall,
                });
                concatable = false;
            }
            v => {
                let leaf = match v {
                    Value::Num(n) => Ast::Num(*n),
                    Value::Str(s) => Ast::Var(s.clone()),
                    _ => unreachable!(),
                };
                if let Some(p) = pow.take() {
                    mults.push_front(Ast::op("^", vec![leaf, p]));
                } else if concatable {
                    match mults.pop_front() {
                        Some(front) => mults
                            .push_front(Ast::op("*", vec![leaf, front])),
                        None => mults.push_front(leaf),
                    }
                } else {
                    mults.push_front(leaf);
                }
                concatable = true;
            }
        }
    }
    if pow.is_some() {
        return Err(Error::NoLeftHandSide("^".to_owned()));
    }
    let mut iter = mults.into_iter();
    let Some(first) = iter.next() else {
        return Err(Error::UnexpectedEmptyGroup);
    };
    Ok(iter.fold(first, |a, b| Ast::op("*", vec![a, b])))
}

////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;

    fn vars(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn p(s: &str) -> Result<(Ast, CompareMode), Error> {
        parse(s, &vars(&["x", "y"]), &HashSet::new())
    }

    fn num(v: f64) -> Ast {
        Ast::Num(v)
    }

    fn var(s: &str) -> Ast {
        Ast::Var(s.to_owned())
    }

    #[test]
    fn test_numbers() {
        assert_eq!(p("12").unwrap().0, num(12.0));
        assert_eq!(p("3.5").unwrap().0, num(3.5));
        // A trailing dot is part of the number; a leading dot is not
        assert_eq!(p("3.").unwrap().0, num(3.0));
        assert!(matches!(
            p(".5"),
            Err(Error::UnexpectedToken(t)) if t == "."
        ));
        assert!(matches!(
            p("3.5.2"),
            Err(Error::UnexpectedToken(t)) if t == "."
        ));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(
            p("2x").unwrap().0,
            Ast::op("*", vec![num(2.0), var("x")])
        );
        assert_eq!(
            p("xy").unwrap().0,
            Ast::op("*", vec![var("x"), var("y")])
        );
        assert_eq!(
            p("2 x").unwrap().0,
            Ast::op("*", vec![num(2.0), var("x")])
        );
        // Trailing separators are ignored
        assert_eq!(p("2 ").unwrap().0, num(2.0));
        assert_eq!(
            p("2(x)").unwrap().0,
            Ast::op("*", vec![num(2.0), var("x")])
        );
    }

    #[test]
    fn test_power_binding() {
        assert_eq!(
            p("x^2").unwrap().0,
            Ast::op("^", vec![var("x"), num(2.0)])
        );
        // Implicit multiplication binds looser than the power
        assert_eq!(
            p("2xy^2").unwrap().0,
            Ast::op(
                "*",
                vec![
                    num(2.0),
                    Ast::op(
                        "*",
                        vec![
                            var("x"),
                            Ast::op("^", vec![var("y"), num(2.0)])
                        ]
                    )
                ]
            )
        );
        // Right-associative
        assert_eq!(
            p("2^x^2").unwrap().0,
            Ast::op(
                "^",
                vec![num(2.0), Ast::op("^", vec![var("x"), num(2.0)])]
            )
        );
        // The power applies to the function application as a whole
        assert_eq!(
            p("sin(x)^2").unwrap().0,
            Ast::op(
                "^",
                vec![
                    Ast::op("sin", vec![var("x")]),
                    num(2.0)
                ]
            )
        );
        // `**` is an alias
        assert_eq!(
            p("x**2").unwrap().0,
            Ast::op("^", vec![var("x"), num(2.0)])
        );
        assert!(matches!(
            p("2^"),
            Err(Error::NoRightHandSide(o)) if o == "^"
        ));
        assert!(matches!(
            p("^2"),
            Err(Error::NoLeftHandSide(o)) if o == "^"
        ));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(p("-x").unwrap().0, Ast::op("-@", vec![var("x")]));
        assert_eq!(
            p("2-x").unwrap().0,
            Ast::op("-", vec![num(2.0), var("x")])
        );
        // Negation of a whole power, not of the base
        assert_eq!(
            p("-x^2").unwrap().0,
            Ast::op("-@", vec![Ast::op("^", vec![var("x"), num(2.0)])])
        );
        assert!(matches!(
            p("x*-y"),
            Err(Error::NoRightHandSide(o)) if o == "*"
        ));
        assert!(matches!(
            p("*x"),
            Err(Error::NoLeftHandSide(o)) if o == "*"
        ));
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            p("sin(x)").unwrap().0,
            Ast::op("sin", vec![var("x")])
        );
        // Function applied to a bare factor
        assert_eq!(
            p("sqrt2").unwrap().0,
            Ast::op("sqrt", vec![num(2.0)])
        );
        assert_eq!(
            p("max(x,y,1)").unwrap().0,
            Ast::op("max", vec![var("x"), var("y"), num(1.0)])
        );
        // Arity is not this layer's problem
        assert_eq!(
            p("atan(y,x)").unwrap().0,
            Ast::op("atan", vec![var("y"), var("x")])
        );
        assert!(matches!(
            p("sin"),
            Err(Error::FunctionArgRequired(f)) if f == "sin"
        ));
        assert!(matches!(p("(x,y)"), Err(Error::FunctionRequired)));
        assert!(matches!(p("x,y"), Err(Error::UnexpectedComma)));
        assert!(matches!(p("sin()"), Err(Error::UnexpectedEmptyGroup)));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(
            p("√x").unwrap().0,
            Ast::op("sqrt", vec![var("x")])
        );
        assert_eq!(
            p("arctan(x)").unwrap().0,
            Ast::op("atan", vec![var("x")])
        );
        assert_eq!(
            p("sgn(x)").unwrap().0,
            Ast::op("sign", vec![var("x")])
        );
        // Constant aliases only resolve when their key is in the vocabulary
        let v = vars(&["x", "pi", "π"]);
        let (ast, _) = parse("2π", &v, &HashSet::new()).unwrap();
        assert_eq!(ast, Ast::op("*", vec![num(2.0), var("pi")]));
        assert!(matches!(p("2π"), Err(Error::UnknownIdentifier(_))));
    }

    #[test]
    fn test_comparators() {
        let (ast, mode) = p("x<y").unwrap();
        assert_eq!(ast, Ast::op("-", vec![var("y"), var("x")]));
        assert_eq!(mode, CompareMode::Gt);

        let (ast, mode) = p("x>y").unwrap();
        assert_eq!(ast, Ast::op("-", vec![var("x"), var("y")]));
        assert_eq!(mode, CompareMode::Gt);

        let (_, mode) = p("x<=y").unwrap();
        assert_eq!(mode, CompareMode::Ge);

        let (ast, mode) = p("y=x").unwrap();
        assert_eq!(ast, Ast::op("-", vec![var("x"), var("y")]));
        assert_eq!(mode, CompareMode::Eq);

        let (_, mode) = p("x").unwrap();
        assert_eq!(mode, CompareMode::Unordered);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(p("(x"), Err(Error::ParenMismatch)));
        assert!(matches!(p("x)"), Err(Error::ParenMismatch)));
        assert!(matches!(p(""), Err(Error::EmptyExpression)));
        assert!(matches!(p("  "), Err(Error::EmptyExpression)));
        assert!(matches!(p("()"), Err(Error::UnexpectedEmptyGroup)));
        assert!(matches!(
            p("foo(x)"),
            Err(Error::UnknownIdentifier(n)) if n == "foo"
        ));
        assert!(matches!(
            p("x$"),
            Err(Error::UnexpectedToken(t)) if t == "$"
        ));
        assert!(matches!(
            p("x+"),
            Err(Error::NoRightHandSide(o)) if o == "+"
        ));
        assert!(matches!(
            p("=x"),
            Err(Error::UnexpectedEmptyGroup)
        ));
    }

    #[test]
    fn test_longest_match() {
        // `xy` as a named variable wins over `x * y`
        let v = vars(&["x", "y", "xy"]);
        let (ast, _) = parse("xy", &v, &HashSet::new()).unwrap();
        assert_eq!(ast, var("xy"));
        // `<=` wins over `<` followed by `=`
        let (_, mode) = p("x<=y").unwrap();
        assert_eq!(mode, CompareMode::Ge);
    }

    #[test]
    fn test_nested_groups() {
        assert_eq!(
            p("(x+1)(x-1)").unwrap().0,
            Ast::op(
                "*",
                vec![
                    Ast::op("+", vec![var("x"), num(1.0)]),
                    Ast::op("-", vec![var("x"), num(1.0)]),
                ]
            )
        );
        assert_eq!(
            p("(x+1)^2").unwrap().0,
            Ast::op(
                "^",
                vec![Ast::op("+", vec![var("x"), num(1.0)]), num(2.0)]
            )
        );
    }
}
