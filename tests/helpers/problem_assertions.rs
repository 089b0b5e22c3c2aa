//! Problem assertion helpers.

use apiguard::{ApiProblem, ProblemFlags, ProblemKind};

/// Assert exactly one problem was reported and return it.
pub fn single_problem(problems: &[ApiProblem]) -> &ApiProblem {
    assert_eq!(
        problems.len(),
        1,
        "Expected exactly one problem, got: {:?}",
        problems.iter().map(|p| p.to_string()).collect::<Vec<_>>()
    );
    &problems[0]
}

/// Problems of the given kind.
pub fn of_kind(problems: &[ApiProblem], kind: ProblemKind) -> Vec<&ApiProblem> {
    problems.iter().filter(|p| p.kind == kind).collect()
}

/// Assert a problem has the expected kind and flags.
pub fn assert_problem(problem: &ApiProblem, kind: ProblemKind, flags: ProblemFlags) {
    assert_eq!(
        (problem.kind, problem.flags),
        (kind, flags),
        "Unexpected problem: {}",
        problem
    );
}

/// Assert no problem was reported.
pub fn assert_no_problems(problems: &[ApiProblem]) {
    assert!(
        problems.is_empty(),
        "Expected no problems, got: {:?}",
        problems.iter().map(|p| p.to_string()).collect::<Vec<_>>()
    );
}
