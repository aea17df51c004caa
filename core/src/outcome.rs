use serde::{Deserialize, Serialize};

pub type BranchId = String;

/// Branch taken when a lookup finds no content. The HTTP ingress answers it
/// with the fallback page and status 404.
pub const NOT_FOUND: &str = "not_found";

/// The explicit result of a transition.
///
/// `Outcome` represents "Control Flow as Data": instead of early returns or
/// panics, every step says whether the pipeline continues, leaves on a named
/// branch, or faults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Outcome<T, E> {
    /// Proceed to the next step with the new state.
    Next(T),

    /// Leave the pipeline on a named path, with optional detail for logs.
    Branch(BranchId, Option<serde_json::Value>),

    /// A failure the pipeline cannot recover from.
    Fault(E),
}

impl<T, E> Outcome<T, E> {
    pub fn next(value: T) -> Self {
        Outcome::Next(value)
    }

    pub fn branch(id: impl Into<BranchId>) -> Self {
        Outcome::Branch(id.into(), None)
    }

    pub fn not_found(detail: serde_json::Value) -> Self {
        Outcome::Branch(NOT_FOUND.to_string(), Some(detail))
    }

    pub fn fault(error: E) -> Self {
        Outcome::Fault(error)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::Branch(id, _) if id == NOT_FOUND)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, op: F) -> Outcome<U, E> {
        match self {
            Outcome::Next(t) => Outcome::Next(op(t)),
            Outcome::Branch(id, detail) => Outcome::Branch(id, detail),
            Outcome::Fault(e) => Outcome::Fault(e),
        }
    }

    pub fn map_err<F2, O: FnOnce(E) -> F2>(self, op: O) -> Outcome<T, F2> {
        match self {
            Outcome::Next(t) => Outcome::Next(t),
            Outcome::Branch(id, detail) => Outcome::Branch(id, detail),
            Outcome::Fault(e) => Outcome::Fault(op(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_branch_is_recognised() {
        let outcome: Outcome<(), String> =
            Outcome::not_found(serde_json::json!({ "slug": "missing" }));
        assert!(outcome.is_not_found());
        assert!(!Outcome::<(), String>::branch("redirect").is_not_found());
    }

    #[test]
    fn test_map_keeps_branches_and_faults() {
        let next: Outcome<u32, String> = Outcome::next(2);
        assert!(matches!(next.map(|n| n * 2), Outcome::Next(4)));

        let fault: Outcome<u32, String> = Outcome::fault("boom".into());
        assert!(matches!(fault.map(|n| n * 2), Outcome::Fault(e) if e == "boom"));
    }
}
