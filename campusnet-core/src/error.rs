//! Error types for the campusnet core library.
//!
//! Validation failures are reported before any algorithm runs and always name
//! the offending input record. Lookup failures signal a broken contract between
//! an algorithm and its disjoint set and are never expected for validated
//! inputs. Infeasible outcomes (a disconnected forest, an insufficient
//! reconnection pool) are not errors; they are reported by the result types.

use std::fmt;

use thiserror::Error;

use crate::{coverage::CategoryId, graph::UserId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Kind of input record named by a [`RecordRef`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecordKind {
    /// A user record.
    User,
    /// A friendship link of the loaded graph.
    Edge,
    /// A link offered in a reconnection candidate pool.
    Candidate,
    /// A coverage category record.
    Category,
}

impl RecordKind {
    const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Edge => "edge",
            Self::Candidate => "candidate",
            Self::Category => "category",
        }
    }
}

/// Position of a record in the sequence handed over by the input loader.
///
/// # Examples
/// ```
/// use campusnet_core::{RecordKind, RecordRef};
///
/// let record = RecordRef::new(RecordKind::Edge, 3);
/// assert_eq!(record.to_string(), "edge #3");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RecordRef {
    kind: RecordKind,
    index: usize,
}

impl RecordRef {
    /// Names the record at `index` (zero-based) of the given kind.
    #[must_use]
    pub const fn new(kind: RecordKind, index: usize) -> Self {
        Self { kind, index }
    }

    /// Returns the kind of the referenced record.
    #[must_use]
    #[rustfmt::skip]
    pub const fn kind(&self) -> RecordKind { self.kind }

    /// Returns the zero-based index of the referenced record.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(&self) -> usize { self.index }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.kind.label(), self.index)
    }
}

/// Malformed input rejected at the load boundary.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// The graph must contain at least one user.
    #[error("the user set is empty")]
    EmptyUserSet,
    /// Two user records share the same identifier.
    #[error("{record} repeats user id {user}")]
    DuplicateUser {
        /// The repeated record.
        record: RecordRef,
        /// The identifier that was already registered.
        user: UserId,
    },
    /// A record references a user that is not part of the user set.
    #[error("{record} references unknown user {user}")]
    UnknownUser {
        /// The record holding the dangling reference.
        record: RecordRef,
        /// The unknown identifier.
        user: UserId,
    },
    /// A record carries a negative cost.
    #[error("{record} has negative cost {cost}")]
    NegativeCost {
        /// The offending record.
        record: RecordRef,
        /// The cost as supplied.
        cost: i64,
    },
    /// Two category records share the same identifier.
    #[error("{record} repeats category id {category}")]
    DuplicateCategory {
        /// The repeated record.
        record: RecordRef,
        /// The identifier that was already registered.
        category: CategoryId,
    },
    /// A category reaches nobody.
    #[error("{record} (category {category}) reaches no users")]
    EmptyReach {
        /// The offending record.
        record: RecordRef,
        /// The category identifier.
        category: CategoryId,
    },
}

define_error_codes! {
    /// Stable codes describing [`ValidationError`] variants.
    enum ValidationErrorCode for ValidationError {
        /// The graph must contain at least one user.
        EmptyUserSet => EmptyUserSet => "VALIDATION_EMPTY_USER_SET",
        /// Two user records share the same identifier.
        DuplicateUser => DuplicateUser { .. } => "VALIDATION_DUPLICATE_USER",
        /// A record references a user that is not part of the user set.
        UnknownUser => UnknownUser { .. } => "VALIDATION_UNKNOWN_USER",
        /// A record carries a negative cost.
        NegativeCost => NegativeCost { .. } => "VALIDATION_NEGATIVE_COST",
        /// Two category records share the same identifier.
        DuplicateCategory => DuplicateCategory { .. } => "VALIDATION_DUPLICATE_CATEGORY",
        /// A category reaches nobody.
        EmptyReach => EmptyReach { .. } => "VALIDATION_EMPTY_REACH",
    }
}

/// Disjoint-set access to an identifier that was never registered.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum LookupError {
    /// The user was not registered with `make_set`.
    #[error("user {user} is not registered in the disjoint set")]
    Unregistered {
        /// The unregistered identifier.
        user: UserId,
    },
}

define_error_codes! {
    /// Stable codes describing [`LookupError`] variants.
    enum LookupErrorCode for LookupError {
        /// The user was not registered with `make_set`.
        Unregistered => Unregistered { .. } => "LOOKUP_UNREGISTERED",
    }
}

/// Error type returned by the public campusnet API.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CampusError {
    /// Input records failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An algorithm addressed a user its disjoint set does not know.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

define_error_codes! {
    /// Stable codes describing [`CampusError`] variants.
    enum CampusErrorCode for CampusError {
        /// Input records failed validation.
        Validation => Validation { .. } => "CAMPUS_VALIDATION",
        /// An algorithm addressed a user its disjoint set does not know.
        Lookup => Lookup { .. } => "CAMPUS_LOOKUP",
    }
}

impl CampusError {
    /// Retrieve the inner [`ValidationErrorCode`] when the error stems from
    /// rejected input.
    #[must_use]
    pub const fn validation_code(&self) -> Option<ValidationErrorCode> {
        match self {
            Self::Validation(error) => Some(error.code()),
            Self::Lookup(_) => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, CampusError>;
