use thiserror::Error;

/// Universal error type for this crate
#[derive(Error, Clone, Debug)]
pub enum Error {
    /// Opening and closing brackets are not balanced
    #[error("parentheses are not balanced")]
    ParenMismatch,

    /// A character sequence that matches no known token
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),

    /// A comma appeared outside of a function argument list
    #[error("unexpected comma")]
    UnexpectedComma,

    /// An identifier that is neither an axis, a built-in, nor a definition
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// A binary operator with nothing on its right
    #[error("no right hand side of {0}")]
    NoRightHandSide(String),

    /// A binary operator with nothing on its left
    #[error("no left hand side of {0}")]
    NoLeftHandSide(String),

    /// A function name with no argument after it
    #[error("function {0} requires an argument")]
    FunctionArgRequired(String),

    /// An argument list with no function in front of it
    #[error("argument list requires a function")]
    FunctionRequired,

    /// A `()` group with nothing inside
    #[error("empty group")]
    UnexpectedEmptyGroup,

    /// The formula contains no expression at all
    #[error("empty expression")]
    EmptyExpression,

    /// A definition depends on itself, directly or through other definitions
    #[error("recursive definition of {0}")]
    RecursiveDefinition(String),

    /// A formula uses a definition which failed to compile
    #[error("{0} is not defined")]
    Dependency(String),

    /// A function call with the wrong number of arguments
    #[error("wrong number of arguments for {0}")]
    WrongArgumentCount(String),

    /// A free variable which is not one of the evaluation axes
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// An operator name with no evaluation rule
    #[error("no operator is defined for {0}")]
    UndefinedOperator(String),

    /// `Node` is not present in this `Context`
    #[error("node is not present in this `Context`")]
    BadNode,

    /// `VarNode` is not present in this `Context`
    #[error("variable is not present in this `Context`")]
    BadVar,

    /// The given `IndexMap` is empty
    #[error("`IndexMap` is empty")]
    EmptyMap,
}
