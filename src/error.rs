use thiserror::Error;

/// Errors raised while building or solving a radial network.
///
/// Bus numbers in messages are external (input file) bus ids unless stated
/// otherwise. Line numbers are 0-based positions in the line list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadialError {
    #[error("network has no buses")]
    EmptyNetwork,

    #[error("bus {0} is defined more than once")]
    DuplicateBus(usize),

    #[error("line {line} references unknown bus {bus}")]
    UnknownBus { line: usize, bus: usize },

    #[error("line {line} connects bus {bus} to itself")]
    SelfLoop { line: usize, bus: usize },

    #[error("no slack bus found")]
    NoSlackBus,

    #[error("slack bus {0} is not defined")]
    UnknownSlackBus(usize),

    #[error("more than one slack bus: {0:?}")]
    MultipleSlackBuses(Vec<usize>),

    #[error("slack bus {bus} is fed by line {line}")]
    SlackHasParent { bus: usize, line: usize },

    #[error("bus {bus} is fed by more than one line ({first} and {second})")]
    MultipleParents {
        bus: usize,
        first: usize,
        second: usize,
    },

    #[error("bus {0} is not reachable from the slack bus (isolated or part of a loop)")]
    Unreachable(usize),

    #[error("numerical instability at bus {bus} in iteration {iteration}")]
    NumericalInstability { bus: usize, iteration: usize },

    #[error("invalid options: {0}")]
    Options(String),

    #[error("{path}: {message}")]
    Parse { path: String, message: String },
}

pub type Result<T> = std::result::Result<T, RadialError>;
