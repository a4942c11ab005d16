//! Conditional execution of functions.
//!
//! A [`Guard`] holds an ordered list of named conditions, a [`Combinator`]
//! and a [`GatePolicy`].  Wrapping a function with [`Guard::wrap`] produces a
//! [`Guarded`] function that only runs when the combined conditions hold:
//!
//! ```
//! use genes_cli::gate::{GatePolicy, Predicate, if_any_funcs};
//!
//! fn always() -> bool { true }
//!
//! let install = if_any_funcs(vec![Predicate::new("always", always)], GatePolicy::Warn)
//!     .wrap("install", |pkg: &str| format!("installed {pkg}"));
//!
//! assert_eq!(install.call("jq").unwrap(), Some("installed jq".to_string()));
//! ```
//!
//! Conditions come in two flavours with separate entry points:
//!
//! - **conds** ([`Flag`]): a boolean fixed when the guard is built.
//! - **funcs** ([`Predicate`]): a zero-argument function re-evaluated on
//!   every call of the wrapped function.
//!
//! When the conditions do not hold, the policy decides what happens: nothing
//! ([`GatePolicy::Silent`]), a warning ([`GatePolicy::Warn`]), or an error log
//! followed by [`GateError::PreconditionNotMet`] ([`GatePolicy::Raise`]).
use std::fmt;
use std::sync::Arc;

use crate::error::GateError;
use crate::logging::Log;

/// What a gate does when its conditions are not satisfied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GatePolicy {
    /// Return nothing without logging.
    Silent,
    /// Log a warning and return nothing.
    #[default]
    Warn,
    /// Log an error and fail with [`GateError::PreconditionNotMet`].
    Raise,
}

/// Logical reduction applied to the evaluated conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// At least one condition must hold (logical OR).
    Any,
    /// Every condition must hold (logical AND).
    All,
}

impl Combinator {
    /// Reduce already-evaluated booleans.
    ///
    /// Takes a slice rather than an iterator so that every condition has been
    /// evaluated before reduction, with no short-circuit.
    #[must_use]
    pub fn reduce(self, values: &[bool]) -> bool {
        match self {
            Self::Any => values.iter().any(|v| *v),
            Self::All => values.iter().all(|v| *v),
        }
    }
}

/// Where a guard's truth values come from.  Only affects message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain booleans ([`Flag`]).
    Conditions,
    /// Zero-argument predicates ([`Predicate`]).
    Functions,
}

/// A named truth value that a [`Guard`] can evaluate.
pub trait Condition: Send + Sync {
    /// Name used in gate messages.
    fn name(&self) -> &str;

    /// Evaluate the condition.
    fn evaluate(&self) -> bool;
}

/// A named boolean captured when the guard is built.
///
/// Use the [`flag!`](crate::flag) macro to name it after its source
/// expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    name: String,
    value: bool,
}

impl Flag {
    /// Create a named boolean condition.
    #[must_use]
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Condition for Flag {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self) -> bool {
        self.value
    }
}

/// A named zero-argument predicate, called each time the gate fires.
///
/// Use the [`predicate!`](crate::predicate) macro to name it after the
/// function path.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    func: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Predicate {
    /// Create a named predicate.
    #[must_use]
    pub fn new(name: impl Into<String>, func: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Condition for Predicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self) -> bool {
        (self.func)()
    }
}

/// Build a [`Flag`] named after the expression that produced it.
///
/// ```
/// use genes_cli::flag;
/// use genes_cli::gate::Condition;
///
/// let debug_build = cfg!(debug_assertions);
/// let f = flag!(debug_build);
/// assert_eq!(f.name(), "debug_build");
/// ```
#[macro_export]
macro_rules! flag {
    ($cond:expr) => {
        $crate::gate::Flag::new(stringify!($cond), $cond)
    };
}

/// Build a [`Predicate`] named after the function it calls.
///
/// ```
/// use genes_cli::predicate;
/// use genes_cli::gate::Condition;
///
/// fn online() -> bool { false }
/// let p = predicate!(online);
/// assert_eq!(p.name(), "online");
/// assert!(!p.evaluate());
/// ```
#[macro_export]
macro_rules! predicate {
    ($func:path) => {
        $crate::gate::Predicate::new(stringify!($func), $func)
    };
}

/// The shared part of every gated function: its conditions and policy.
#[derive(Clone)]
pub struct Guard {
    conditions: Vec<Arc<dyn Condition>>,
    combinator: Combinator,
    source: SourceKind,
    policy: GatePolicy,
    sink: Option<Arc<dyn Log>>,
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("conditions", &self.condition_names())
            .field("combinator", &self.combinator)
            .field("source", &self.source)
            .field("policy", &self.policy)
            .field("sink", &self.sink.as_ref().map(|_| "<dyn Log>"))
            .finish()
    }
}

impl Guard {
    /// Build a guard from arbitrary conditions.
    ///
    /// The four `if_*` constructors cover the usual cases; this is the
    /// generic form they share.
    #[must_use]
    pub fn new(
        conditions: Vec<Arc<dyn Condition>>,
        combinator: Combinator,
        source: SourceKind,
        policy: GatePolicy,
    ) -> Self {
        Self {
            conditions,
            combinator,
            source,
            policy,
            sink: None,
        }
    }

    /// Send warnings and errors to `sink` instead of the global tracing
    /// subscriber.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn Log>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Policy applied when the conditions are not satisfied.
    #[must_use]
    pub const fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Combinator used to reduce the conditions.
    #[must_use]
    pub const fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Names of all conditions in declaration order.
    #[must_use]
    pub fn condition_names(&self) -> Vec<&str> {
        self.conditions.iter().map(|c| c.name()).collect()
    }

    /// Evaluate every condition once and reduce the results.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        let values: Vec<bool> = self.conditions.iter().map(|c| c.evaluate()).collect();
        self.combinator.reduce(&values)
    }

    /// Message logged (and carried by the error) when `target` is refused.
    #[must_use]
    pub fn refusal_message(&self, target: &str) -> String {
        let names = self.condition_names().join(" ");
        match (self.combinator, self.source) {
            (Combinator::Any, SourceKind::Conditions) => format!(
                "This function: {target} was not run because none of the following condtions were True: {names}"
            ),
            (Combinator::Any, SourceKind::Functions) => format!(
                "This function: {target} was not run because none of the following functions returned True: {names}"
            ),
            (Combinator::All, SourceKind::Conditions) => format!(
                "This function: {target} was not run because one of the following conditions was False: {names}"
            ),
            (Combinator::All, SourceKind::Functions) => format!(
                "This function: {target} was not run because one of the following functions returned False: {names}"
            ),
        }
    }

    /// Decide whether `target` may run on this call.
    ///
    /// Returns `Ok(true)` when the conditions hold, `Ok(false)` when they do
    /// not and the policy tolerates it.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::PreconditionNotMet`] when the conditions do not
    /// hold under [`GatePolicy::Raise`].
    pub fn admit(&self, target: &str) -> Result<bool, GateError> {
        if self.is_satisfied() {
            return Ok(true);
        }
        match self.policy {
            GatePolicy::Silent => Ok(false),
            GatePolicy::Warn => {
                self.warn(&self.refusal_message(target));
                Ok(false)
            }
            GatePolicy::Raise => {
                let msg = self.refusal_message(target);
                self.error(&msg);
                Err(GateError::PreconditionNotMet(msg))
            }
        }
    }

    /// Run `func` (identified as `target` in messages) if the gate admits it.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::PreconditionNotMet`] under [`GatePolicy::Raise`]
    /// when the conditions do not hold; `func` is not called in that case.
    pub fn run<R>(&self, target: &str, func: impl FnOnce() -> R) -> Result<Option<R>, GateError> {
        Ok(self.admit(target)?.then(func))
    }

    /// Wrap `func`, naming it `name` in gate messages.
    #[must_use]
    pub fn wrap<F>(self, name: impl Into<String>, func: F) -> Guarded<F> {
        Guarded {
            name: name.into(),
            doc: None,
            func,
            guard: self,
        }
    }

    fn warn(&self, msg: &str) {
        match &self.sink {
            Some(sink) => sink.warn(msg),
            None => tracing::warn!("{msg}"),
        }
    }

    fn error(&self, msg: &str) {
        match &self.sink {
            Some(sink) => sink.error(msg),
            None => tracing::error!("{msg}"),
        }
    }
}

fn erase<C: Condition + 'static>(conditions: Vec<C>) -> Vec<Arc<dyn Condition>> {
    conditions
        .into_iter()
        .map(|c| Arc::new(c) as Arc<dyn Condition>)
        .collect()
}

/// Guard that admits a call when any of `conds` is true.
#[must_use]
pub fn if_any_conds(conds: Vec<Flag>, policy: GatePolicy) -> Guard {
    Guard::new(erase(conds), Combinator::Any, SourceKind::Conditions, policy)
}

/// Guard that admits a call when any of `funcs` returns true.
#[must_use]
pub fn if_any_funcs(funcs: Vec<Predicate>, policy: GatePolicy) -> Guard {
    Guard::new(erase(funcs), Combinator::Any, SourceKind::Functions, policy)
}

/// Guard that admits a call when all of `conds` are true.
#[must_use]
pub fn if_all_conds(conds: Vec<Flag>, policy: GatePolicy) -> Guard {
    Guard::new(erase(conds), Combinator::All, SourceKind::Conditions, policy)
}

/// Guard that admits a call when all of `funcs` return true.
#[must_use]
pub fn if_all_funcs(funcs: Vec<Predicate>, policy: GatePolicy) -> Guard {
    Guard::new(erase(funcs), Combinator::All, SourceKind::Functions, policy)
}

/// A function paired with the [`Guard`] that decides whether it runs.
///
/// Keeps the wrapped function's name and documentation so that messages and
/// debug output identify the original function.
#[derive(Clone)]
pub struct Guarded<F> {
    name: String,
    doc: Option<String>,
    func: F,
    guard: Guard,
}

impl<F> fmt::Debug for Guarded<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guarded")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<F> Guarded<F> {
    /// Attach documentation for the wrapped function.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Name of the wrapped function.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Documentation of the wrapped function, if any was attached.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// The guard deciding whether the function runs.
    #[must_use]
    pub const fn guard(&self) -> &Guard {
        &self.guard
    }

    /// Call the wrapped function with `args` if the guard admits it.
    ///
    /// Multiple arguments are passed as a tuple.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::PreconditionNotMet`] under [`GatePolicy::Raise`]
    /// when the conditions do not hold.
    pub fn call<A, R>(&self, args: A) -> Result<Option<R>, GateError>
    where
        F: Fn(A) -> R,
    {
        self.guard.run(&self.name, || (self.func)(args))
    }

    /// Call a wrapped zero-argument function if the guard admits it.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::PreconditionNotMet`] under [`GatePolicy::Raise`]
    /// when the conditions do not hold.
    pub fn invoke<R>(&self) -> Result<Option<R>, GateError>
    where
        F: Fn() -> R,
    {
        self.guard.run(&self.name, &self.func)
    }
}
