/// Result of an operation that recovers locally from failure.
///
/// Callers always get a usable value; `Fallback` additionally carries the
/// error that forced the substitute, so "used fallback" stays
/// distinguishable from "succeeded" without ever being fatal.
#[derive(Debug)]
pub enum Outcome<T, E> {
    Fetched(T),
    Fallback { value: T, cause: E },
}

impl<T, E> Outcome<T, E> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Fetched(value) => value,
            Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Fetched(value) => value,
            Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Outcome::Fallback { .. })
    }

    pub fn cause(&self) -> Option<&E> {
        match self {
            Outcome::Fetched(_) => None,
            Outcome::Fallback { cause, .. } => Some(cause),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Fetched(value) => Outcome::Fetched(f(value)),
            Outcome::Fallback { value, cause } => Outcome::Fallback {
                value: f(value),
                cause,
            },
        }
    }
}
