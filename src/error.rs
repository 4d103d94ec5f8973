use thiserror::Error;

/// Failures of a single search invocation.
///
/// Not finding a solution is not an error, drivers report it as `None`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// An optional capability was used on a problem that does not provide it.
    #[error("'{capability}' is not implemented for this problem")]
    Unimplemented { capability: &'static str },
    /// The CSP dispatcher was given a name it does not know.
    #[error("Unrecognized search algorithm '{0}' (expected one of: backtracking, dfs, best_first)")]
    UnrecognizedAlgorithm(String),
    #[error("Variable '{variable}' has no domain")]
    MissingDomain { variable: String },
    #[error("Variable '{variable}' is declared more than once")]
    DuplicateVariable { variable: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let e = SearchError::UnrecognizedAlgorithm("simulated_annealing".to_string());
        assert!(e.to_string().contains("'simulated_annealing'"));

        let e = SearchError::Unimplemented {
            capability: "view_state",
        };
        assert!(e.to_string().contains("view_state"));
    }
}
