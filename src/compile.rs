//! Compiling batches of formulas into a shared [`Context`]
//!
//! A batch mixes two kinds of lines: *definitions* (`a=1`, `f(a,b)=a+b`),
//! which bind names for the rest of the batch, and *equations*, which are
//! the things actually plotted.  Definitions are fully inlined into the
//! equations that use them, so each successful equation comes out as a
//! single self-contained [`Node`] in one deduplicating [`Context`].
//!
//! Name resolution is batch-wide: a definition is visible to every other
//! line regardless of order, the first definition of a name wins, and
//! lines that would redefine an earlier name (or a built-in function)
//! parse as equations instead.  Cycles and references to broken
//! definitions are reported per line, never as a batch failure.
//!
//! ```
//! # use levelset::compile::{compile_formulas, FormulaKind};
//! let batch = compile_formulas(&["d=hypot(x,y)", "d<1"], &["x", "y"], &[]);
//! let circle = &batch.results[1];
//! assert!(circle.error.is_none());
//! assert!(matches!(circle.kind, FormulaKind::Equation { .. }));
//! assert!(circle.node.is_some());
//! ```

use crate::context::{Context, Node};
use crate::parse::{parse, Ast, CompareMode, ALIASES, BUILTIN_FUNCTIONS};
use crate::Error;
use std::collections::{HashMap, HashSet};

/// What a single formula line turned out to be
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormulaKind {
    /// A plotted equation or inequality
    Equation {
        /// Comparison mode; [`CompareMode::Unordered`] when the line has no
        /// comparator, and also when it failed to parse
        mode: CompareMode,
    },
    /// A named scalar definition
    Variable {
        /// Defined name
        name: String,
    },
    /// A named function definition
    Function {
        /// Defined name
        name: String,
        /// Formal parameters, in declaration order
        params: Vec<String>,
    },
}

impl FormulaKind {
    /// Returns the defined name, if this is a definition
    pub fn name(&self) -> Option<&str> {
        match self {
            FormulaKind::Equation { .. } => None,
            FormulaKind::Variable { name }
            | FormulaKind::Function { name, .. } => Some(name),
        }
    }
}

/// Per-line output of [`compile_formulas`]
#[derive(Clone, Debug)]
pub struct CompileResult {
    /// How the line was classified
    pub kind: FormulaKind,
    /// Root of the fully-inlined expression, for equations that compiled
    ///
    /// Definitions do not produce a node of their own; their bodies are
    /// inlined into the equations that reference them.
    pub node: Option<Node>,
    /// Names this line references: free variables (including axis names)
    /// and calls to batch-defined functions, in first-use order
    pub deps: Vec<String>,
    /// First error hit while parsing, resolving, or inlining this line
    pub error: Option<Error>,
}

/// Output of [`compile_formulas`]: one result per input line, plus the
/// [`Context`] that owns every compiled node
#[derive(Debug)]
pub struct CompileBatch {
    /// Shared expression arena
    pub context: Context,
    /// One entry per input formula, in input order (presets excluded)
    pub results: Vec<CompileResult>,
}

/// Standard definitions for 2D batches: `pi`, `e`, `mod`, and the polar
/// helpers `r` and `theta`
pub fn presets_2d() -> &'static [&'static str] {
    &[
        "pi=3.141592653589793",
        "e=2.718281828459045",
        "mod(a,b)=a-floor(a/b)*b",
        "r=hypot(x,y)",
        "theta=atan2(y,x)",
    ]
}

/// Standard definitions for 3D batches: `pi`, `e`, `mod`, and the
/// spherical helpers `r`, `theta`, `phi`
pub fn presets_3d() -> &'static [&'static str] {
    &[
        "pi=3.141592653589793",
        "e=2.718281828459045",
        "mod(a,b)=a-floor(a/b)*b",
        "r=hypot(hypot(x,y),z)",
        "theta=atan2(y,x)",
        "phi=atan2(z,hypot(x,y))",
    ]
}

/// Compiles a batch of formulas against the given axis names
///
/// `presets` are extra definition lines compiled ahead of the batch (see
/// [`presets_2d`] and [`presets_3d`]); they claim their names first and do
/// not appear in the results.
///
/// Errors never abort the batch: a line that fails to parse, resolve, or
/// inline carries its error in its own [`CompileResult`].
pub fn compile_formulas(
    texts: &[&str],
    axes: &[&str],
    presets: &[&str],
) -> CompileBatch {
    let all: Vec<&str> = presets.iter().chain(texts).copied().collect();

    // Names are batch-wide: collect every definition-shaped head before
    // parsing anything, so later definitions are visible to earlier lines.
    let mut var_names: HashSet<String> =
        axes.iter().map(|s| s.to_string()).collect();
    let mut func_names: HashSet<String> = HashSet::new();
    for text in &all {
        if let Some((name, params, _)) = split_head(text) {
            if params.is_some() {
                func_names.insert(name);
            } else {
                var_names.insert(name);
            }
        }
    }
    for (alias, target) in ALIASES {
        if var_names.contains(*target) {
            var_names.insert((*alias).to_string());
        }
    }

    let mut formulas: Vec<Formula> = Vec::with_capacity(all.len());
    let mut defs: HashMap<String, usize> = HashMap::new();
    for (i, text) in all.iter().enumerate() {
        let formula = match split_head(text) {
            Some((name, params, body))
                if !defs.contains_key(&name)
                    && !BUILTIN_FUNCTIONS.contains(&name.as_str()) =>
            {
                defs.insert(name.clone(), i);
                match params {
                    Some(params) => {
                        // Parameters are only in scope for this body
                        let mut scoped = var_names.clone();
                        scoped.extend(params.iter().cloned());
                        match parse(body, &scoped, &func_names) {
                            Ok((ast, _)) => Formula {
                                deps: extract_deps(
                                    &ast,
                                    &params,
                                    &func_names,
                                ),
                                kind: FormulaKind::Function { name, params },
                                ast: Some(ast),
                                error: None,
                            },
                            Err(e) => Formula {
                                kind: FormulaKind::Function { name, params },
                                ast: None,
                                deps: vec![],
                                error: Some(e),
                            },
                        }
                    }
                    None => match parse(body, &var_names, &func_names) {
                        Ok((ast, _)) => Formula {
                            deps: extract_deps(&ast, &[], &func_names),
                            kind: FormulaKind::Variable { name },
                            ast: Some(ast),
                            error: None,
                        },
                        Err(e) => Formula {
                            kind: FormulaKind::Variable { name },
                            ast: None,
                            deps: vec![],
                            error: Some(e),
                        },
                    },
                }
            }
            _ => match parse(text, &var_names, &func_names) {
                Ok((ast, mode)) => Formula {
                    deps: extract_deps(&ast, &[], &func_names),
                    kind: FormulaKind::Equation { mode },
                    ast: Some(ast),
                    error: None,
                },
                Err(e) => Formula {
                    kind: FormulaKind::Equation {
                        mode: CompareMode::Unordered,
                    },
                    ast: None,
                    deps: vec![],
                    error: Some(e),
                },
            },
        };
        formulas.push(formula);
    }

    recursive_check(&mut formulas, &defs);

    let defs_view = Defs {
        index: &defs,
        formulas: &formulas,
    };
    let mut memo = Memo::default();
    let mut ctx = Context::new();
    let mut results = Vec::with_capacity(texts.len());
    for f in formulas.iter().skip(presets.len()) {
        let mut error = f.error.clone();
        let mut node = None;
        if error.is_none() {
            if let (FormulaKind::Equation { .. }, Some(ast)) =
                (&f.kind, &f.ast)
            {
                match inline(&mut ctx, ast, &defs_view, &HashMap::new(), &mut memo)
                {
                    Ok(n) => node = Some(n),
                    Err(e) => error = Some(e),
                }
            }
        }
        results.push(CompileResult {
            kind: f.kind.clone(),
            node,
            deps: f.deps.clone(),
            error,
        });
    }
    log::debug!(
        "compiled {} formulas into {} nodes",
        texts.len(),
        ctx.len()
    );
    CompileBatch {
        context: ctx,
        results,
    }
}

/// Rewrites a bare expression as an equation against an unused axis
///
/// An expression with no comparator whose free variables leave at least one
/// axis unused plots as a graph: `sin(x)` over axes `[x, y]` becomes
/// `y - sin(x)` with [`CompareMode::Eq`].  The last unused axis is the one
/// solved for.  Everything else passes through unchanged.
///
/// The check runs on the compiled node, so a formula like `a+1` with `a`
/// defined elsewhere in the batch still wraps.
pub fn wrap_plain_equation(
    ctx: &mut Context,
    node: Node,
    mode: CompareMode,
    axes: &[&str],
) -> Result<(Node, CompareMode), Error> {
    if mode != CompareMode::Unordered {
        return Ok((node, mode));
    }
    let free = free_variables(ctx, node)?;
    if !free.iter().all(|f| axes.iter().any(|a| a == f)) {
        return Ok((node, mode));
    }
    let missing: Vec<&str> = axes
        .iter()
        .copied()
        .filter(|a| !free.iter().any(|f| f == a))
        .collect();
    let Some(&axis) = missing.last() else {
        return Ok((node, mode));
    };
    let v = ctx.var(axis);
    let wrapped = ctx.sub(v, node)?;
    Ok((wrapped, CompareMode::Eq))
}

////////////////////////////////////////////////////////////////////////////

/// A parsed line, before inlining
struct Formula {
    kind: FormulaKind,
    ast: Option<Ast>,
    deps: Vec<String>,
    error: Option<Error>,
}

fn ascii_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Splits a `name = body` or `name(p, q) = body` head from a line
///
/// This is shape only; whether the line actually becomes a definition also
/// depends on which names were claimed before it.
fn split_head(text: &str) -> Option<(String, Option<Vec<String>>, &str)> {
    let eq = text.find('=')?;
    let head = text[..eq].trim();
    let body = &text[eq + 1..];
    if let Some(open) = head.find('(') {
        let name = head[..open].trim_end();
        let rest = head[open + 1..].strip_suffix(')')?;
        let params: Vec<String> =
            rest.split(',').map(|p| p.trim().to_owned()).collect();
        if !ascii_name(name) || !params.iter().all(|p| ascii_name(p)) {
            return None;
        }
        Some((name.to_owned(), Some(params), body))
    } else {
        if !ascii_name(head) {
            return None;
        }
        Some((head.to_owned(), None, body))
    }
}

/// Collects referenced names: free variables plus batch-defined function
/// calls, in first-use order
fn extract_deps(
    ast: &Ast,
    params: &[String],
    user_funcs: &HashSet<String>,
) -> Vec<String> {
    fn walk(
        ast: &Ast,
        params: &[String],
        user_funcs: &HashSet<String>,
        out: &mut Vec<String>,
    ) {
        match ast {
            Ast::Num(_) => (),
            Ast::Var(name) => {
                if !params.contains(name) && !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Ast::Op { name, args } => {
                if user_funcs.contains(name) && !out.contains(name) {
                    out.push(name.clone());
                }
                for a in args {
                    walk(a, params, user_funcs, out);
                }
            }
        }
    }
    let mut out = vec![];
    walk(ast, params, user_funcs, &mut out);
    out
}

/// Marks recursive definitions and lines depending on broken ones
///
/// A depth-first walk keeps the path of in-progress definitions; closing a
/// cycle marks every definition on it, and afterwards any line whose
/// dependency carries an error is marked as depending on it.  Existing
/// errors (e.g. parse failures) are never overwritten.
fn recursive_check(
    formulas: &mut [Formula],
    defs: &HashMap<String, usize>,
) {
    fn check(
        formulas: &mut [Formula],
        defs: &HashMap<String, usize>,
        path: &mut Vec<usize>,
        i: usize,
    ) {
        if formulas[i].error.is_some() {
            return;
        }
        let is_def = !matches!(formulas[i].kind, FormulaKind::Equation { .. });
        if is_def {
            if let Some(pos) = path.iter().position(|&p| p == i) {
                for &p in &path[pos..] {
                    if formulas[p].error.is_none() {
                        if let Some(name) = formulas[p].kind.name() {
                            formulas[p].error = Some(
                                Error::RecursiveDefinition(name.to_owned()),
                            );
                        }
                    }
                }
                return;
            }
            path.push(i);
        }
        let deps = formulas[i].deps.clone();
        for dep in &deps {
            if let Some(&j) = defs.get(dep) {
                check(formulas, defs, path, j);
            }
        }
        if formulas[i].error.is_none() {
            let bad = deps.iter().find(|d| {
                defs.get(*d)
                    .is_some_and(|&j| formulas[j].error.is_some())
            });
            if let Some(d) = bad {
                formulas[i].error = Some(Error::Dependency(d.clone()));
            }
        }
        if is_def {
            path.pop();
        }
    }
    for i in 0..formulas.len() {
        let mut path = vec![];
        check(formulas, defs, &mut path, i);
    }
}

////////////////////////////////////////////////////////////////////////////

/// Resolved definitions, for the inlining pass
///
/// Errored definitions are invisible here; any line that could reach one
/// was already marked by [`recursive_check`].
struct Defs<'a> {
    index: &'a HashMap<String, usize>,
    formulas: &'a [Formula],
}

impl Defs<'_> {
    fn lookup(&self, name: &str) -> Option<&Formula> {
        let f = &self.formulas[*self.index.get(name)?];
        if f.error.is_some() {
            None
        } else {
            Some(f)
        }
    }

    fn variable(&self, name: &str) -> Option<&Ast> {
        let f = self.lookup(name)?;
        match (&f.kind, &f.ast) {
            (FormulaKind::Variable { .. }, Some(ast)) => Some(ast),
            _ => None,
        }
    }

    fn function(&self, name: &str) -> Option<(&[String], &Ast)> {
        let f = self.lookup(name)?;
        match (&f.kind, &f.ast) {
            (FormulaKind::Function { params, .. }, Some(ast)) => {
                Some((params, ast))
            }
            _ => None,
        }
    }
}

/// Inlining caches, shared across a whole batch
///
/// Scalar definitions expand with no scope, so a name alone is a valid
/// key; function calls key on the argument nodes, which the deduplicating
/// [`Context`] makes canonical.
#[derive(Default)]
struct Memo {
    vars: HashMap<String, Node>,
    calls: HashMap<(String, Vec<Node>), Node>,
}

fn inline(
    ctx: &mut Context,
    ast: &Ast,
    defs: &Defs,
    scope: &HashMap<String, Node>,
    memo: &mut Memo,
) -> Result<Node, Error> {
    match ast {
        Ast::Num(v) => Ok(ctx.constant(*v)),
        Ast::Var(name) => {
            if let Some(&n) = scope.get(name) {
                return Ok(n);
            }
            if let Some(&n) = memo.vars.get(name) {
                return Ok(n);
            }
            if let Some(body) = defs.variable(name) {
                // Definition bodies never see the caller's parameters
                let n = inline(ctx, body, defs, &HashMap::new(), memo)?;
                memo.vars.insert(name.clone(), n);
                return Ok(n);
            }
            Ok(ctx.var(name))
        }
        Ast::Op { name, args } => {
            let mut nodes = Vec::with_capacity(args.len());
            for a in args {
                nodes.push(inline(ctx, a, defs, scope, memo)?);
            }
            let Some((params, body)) = defs.function(name) else {
                return ctx.op_from_name(name, nodes);
            };
            if params.len() != nodes.len() {
                return Err(Error::WrongArgumentCount(format!(
                    "{}({})",
                    name,
                    params.join(",")
                )));
            }
            let key = (name.clone(), nodes.clone());
            if let Some(&n) = memo.calls.get(&key) {
                return Ok(n);
            }
            let inner: HashMap<String, Node> = params
                .iter()
                .cloned()
                .zip(nodes.iter().copied())
                .collect();
            let n = inline(ctx, body, defs, &inner, memo)?;
            memo.calls.insert(key, n);
            Ok(n)
        }
    }
}

/// Variable names reachable from `node`, in first-visit order
fn free_variables(ctx: &Context, node: Node) -> Result<Vec<String>, Error> {
    let mut seen = HashSet::new();
    let mut todo = vec![node];
    let mut out: Vec<String> = vec![];
    while let Some(n) = todo.pop() {
        if !seen.insert(n) {
            continue;
        }
        let op = ctx.get_op(n).ok_or(Error::BadNode)?;
        if let Some(name) = ctx.var_name(n)? {
            if !out.iter().any(|v| v == name) {
                out.push(name.to_owned());
            }
        }
        todo.extend(op.iter_children());
    }
    Ok(out)
}

////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::BTreeMap;

    fn constant(batch: &CompileBatch, i: usize) -> f64 {
        let r = &batch.results[i];
        assert!(r.error.is_none(), "unexpected error: {:?}", r.error);
        let node = r.node.unwrap();
        batch.context.const_value(node).unwrap().unwrap()
    }

    #[test]
    fn test_presets() {
        let batch =
            compile_formulas(&["2π", "mod(7,3)"], &["x", "y"], presets_2d());
        assert_eq!(batch.results.len(), 2);
        assert!((constant(&batch, 0) - 2.0 * std::f64::consts::PI).abs() < 1e-12);
        assert_eq!(constant(&batch, 1), 1.0);
    }

    #[test]
    fn test_polar_preset() {
        let batch = compile_formulas(
            &["max(abs(x),abs(y))<1+sin(4theta)/3"],
            &["x", "y"],
            presets_2d(),
        );
        let r = &batch.results[0];
        assert!(r.error.is_none());
        assert_eq!(
            r.kind,
            FormulaKind::Equation {
                mode: CompareMode::Gt
            }
        );
        assert!(r.deps.iter().any(|d| d == "theta"));
        // theta inlines to atan2, leaving only the axes free
        let mut free =
            free_variables(&batch.context, r.node.unwrap()).unwrap();
        free.sort();
        assert_eq!(free, vec!["x", "y"]);
    }

    #[test]
    fn test_first_definition_wins() {
        let batch = compile_formulas(&["a=1", "a=2", "a"], &["x", "y"], &[]);
        assert_eq!(
            batch.results[0].kind,
            FormulaKind::Variable {
                name: "a".to_owned()
            }
        );
        // The second `a=2` is an equation comparing 2 against a
        assert_eq!(
            batch.results[1].kind,
            FormulaKind::Equation {
                mode: CompareMode::Eq
            }
        );
        assert_eq!(constant(&batch, 1), 1.0); // 2 - a = 2 - 1
        assert_eq!(constant(&batch, 2), 1.0);
    }

    #[test]
    fn test_forward_reference() {
        let batch =
            compile_formulas(&["a=b+1", "b=2", "a"], &["x", "y"], &[]);
        assert_eq!(constant(&batch, 2), 3.0);
    }

    #[test]
    fn test_recursive_definitions() {
        let batch =
            compile_formulas(&["a=b", "b=a", "c=a+1", "c"], &["x", "y"], &[]);
        assert!(matches!(
            batch.results[0].error,
            Some(Error::RecursiveDefinition(ref n)) if n == "a"
        ));
        assert!(matches!(
            batch.results[1].error,
            Some(Error::RecursiveDefinition(ref n)) if n == "b"
        ));
        assert!(matches!(
            batch.results[2].error,
            Some(Error::Dependency(ref n)) if n == "a"
        ));
        assert!(matches!(
            batch.results[3].error,
            Some(Error::Dependency(ref n)) if n == "c"
        ));
        assert!(batch.results.iter().all(|r| r.node.is_none()));
    }

    #[test]
    fn test_self_recursion() {
        let batch = compile_formulas(&["a=a+1"], &["x", "y"], &[]);
        assert!(matches!(
            batch.results[0].error,
            Some(Error::RecursiveDefinition(ref n)) if n == "a"
        ));
    }

    #[test]
    fn test_wrong_argument_count() {
        let batch =
            compile_formulas(&["f(a,b)=a+b", "f(1)"], &["x", "y"], &[]);
        assert!(batch.results[0].error.is_none());
        assert!(matches!(
            batch.results[1].error,
            Some(Error::WrongArgumentCount(ref s)) if s == "f(a,b)"
        ));
    }

    #[test]
    fn test_function_inlining() {
        let batch =
            compile_formulas(&["f(a)=a*a+1", "f(f(2))"], &["x", "y"], &[]);
        assert_eq!(constant(&batch, 1), 26.0);
        // Spaces are allowed around the head
        let batch =
            compile_formulas(&["g (a) = 2a", "g(3)"], &["x", "y"], &[]);
        assert_eq!(constant(&batch, 1), 6.0);
    }

    #[test]
    fn test_axis_shadowing() {
        let batch = compile_formulas(&["y=5", "x+y"], &["x", "y"], &[]);
        assert_eq!(
            batch.results[0].kind,
            FormulaKind::Variable {
                name: "y".to_owned()
            }
        );
        let node = batch.results[1].node.unwrap();
        let vars: BTreeMap<String, f64> =
            [("x".to_owned(), 2.0)].into_iter().collect();
        assert_eq!(batch.context.eval(node, &vars).unwrap(), 7.0);
    }

    #[test]
    fn test_builtin_names_stay_builtin() {
        let batch = compile_formulas(&["sin=3"], &["x", "y"], &[]);
        assert!(matches!(
            batch.results[0].kind,
            FormulaKind::Equation { .. }
        ));
        assert!(matches!(
            batch.results[0].error,
            Some(Error::FunctionArgRequired(ref f)) if f == "sin"
        ));
    }

    #[test]
    fn test_broken_definition_body() {
        let batch =
            compile_formulas(&["a=", "b=a+1", "b+1"], &["x", "y"], &[]);
        assert!(matches!(
            batch.results[0].error,
            Some(Error::EmptyExpression)
        ));
        assert!(matches!(
            batch.results[1].error,
            Some(Error::Dependency(ref n)) if n == "a"
        ));
        assert!(matches!(
            batch.results[2].error,
            Some(Error::Dependency(ref n)) if n == "b"
        ));
    }

    #[test]
    fn test_deps() {
        let batch = compile_formulas(
            &["f(a)=a+x", "f(2)+theta"],
            &["x", "y"],
            presets_2d(),
        );
        assert_eq!(batch.results[0].deps, vec!["x"]);
        assert_eq!(batch.results[1].deps, vec!["f", "theta"]);
    }

    #[test]
    fn test_wrap_plain_equation() {
        let mut batch = compile_formulas(&["sin(x)"], &["x", "y"], &[]);
        let node = batch.results[0].node.unwrap();
        let FormulaKind::Equation { mode } = batch.results[0].kind.clone()
        else {
            panic!("not an equation");
        };
        assert_eq!(mode, CompareMode::Unordered);
        let (node, mode) =
            wrap_plain_equation(&mut batch.context, node, mode, &["x", "y"])
                .unwrap();
        assert_eq!(mode, CompareMode::Eq);
        let at = |x: f64, y: f64| {
            let vars: BTreeMap<String, f64> =
                [("x".to_owned(), x), ("y".to_owned(), y)]
                    .into_iter()
                    .collect();
            batch.context.eval(node, &vars).unwrap()
        };
        // y - sin(x)
        assert_eq!(at(0.0, 0.0), 0.0);
        assert_eq!(at(0.0, 1.0), 1.0);
    }

    #[test]
    fn test_wrap_constant_and_y() {
        // A constant expression wraps against the last axis
        let mut batch = compile_formulas(&["5"], &["x", "y"], &[]);
        let node = batch.results[0].node.unwrap();
        let (node, mode) = wrap_plain_equation(
            &mut batch.context,
            node,
            CompareMode::Unordered,
            &["x", "y"],
        )
        .unwrap();
        assert_eq!(mode, CompareMode::Eq);
        let vars: BTreeMap<String, f64> =
            [("x".to_owned(), 0.0), ("y".to_owned(), 5.0)]
                .into_iter()
                .collect();
        assert_eq!(batch.context.eval(node, &vars).unwrap(), 0.0);

        // An expression in y alone solves for x
        let mut batch = compile_formulas(&["cos(y)"], &["x", "y"], &[]);
        let node = batch.results[0].node.unwrap();
        let (node, _) = wrap_plain_equation(
            &mut batch.context,
            node,
            CompareMode::Unordered,
            &["x", "y"],
        )
        .unwrap();
        let vars: BTreeMap<String, f64> =
            [("x".to_owned(), 1.0), ("y".to_owned(), 0.0)]
                .into_iter()
                .collect();
        assert_eq!(batch.context.eval(node, &vars).unwrap(), 0.0);
    }

    #[test]
    fn test_wrap_leaves_comparisons_alone() {
        let mut batch = compile_formulas(&["x<1"], &["x", "y"], &[]);
        let node = batch.results[0].node.unwrap();
        let (wrapped, mode) = wrap_plain_equation(
            &mut batch.context,
            node,
            CompareMode::Gt,
            &["x", "y"],
        )
        .unwrap();
        assert_eq!(wrapped, node);
        assert_eq!(mode, CompareMode::Gt);
        // Both axes used: nothing to solve for
        let mut batch = compile_formulas(&["x*y"], &["x", "y"], &[]);
        let node = batch.results[0].node.unwrap();
        let (wrapped, mode) = wrap_plain_equation(
            &mut batch.context,
            node,
            CompareMode::Unordered,
            &["x", "y"],
        )
        .unwrap();
        assert_eq!(wrapped, node);
        assert_eq!(mode, CompareMode::Unordered);
    }
}
