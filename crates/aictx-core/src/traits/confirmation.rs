//! Operator confirmation trait.

/// Asks the operator a yes/no question.
pub trait Confirmation {
    /// Return true when the operator agrees.
    fn confirm(&self, question: &str) -> bool;
}
