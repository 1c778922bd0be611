use thiserror::Error;

/// Rejection reasons for a caller-supplied seed vector.
///
/// Seeds produced by the registry or the jump operator never fail these
/// checks once the starting seed was legal, so this error only surfaces from
/// explicit seeding calls.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InvalidSeed {
    #[error("at least one element of the seed must be non-zero")]
    AllZero,
    #[error("a seed whose only non-zero element is the last one must not equal {value:#010x}")]
    ForbiddenLastWord { value: u32 },
    #[error("seed must contain {expected} values, got {found}")]
    WrongLength { expected: usize, found: usize },
}
