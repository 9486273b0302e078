//! Canonicalization of answer text for the local equivalence check.

/// Characters that absorb adjacent whitespace during normalization.
fn attaches(ch: char) -> bool {
    matches!(ch, '(' | ')' | ',' | ';')
}

/// Canonicalize answer text for comparison.
///
/// Rules, applied in order: trim leading/trailing whitespace; collapse
/// internal whitespace runs to a single space; drop whitespace adjacent to
/// `(`, `)`, `,`, `;`; upper-case the result. Deterministic, side-effect
/// free, and idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.trim().chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            if !out.is_empty() && !attaches(ch) && !out.ends_with(['(', ')', ',', ';']) {
                out.push(' ');
            }
            pending_space = false;
        }
        for upper in ch.to_uppercase() {
            out.push(upper);
        }
    }

    out
}

/// The sole local-correctness oracle: canonical equality of submitted text
/// and the reference solution. The remote evaluator is trusted for feedback
/// content, but pass/fail branching is decided here.
#[must_use]
pub fn is_locally_correct(submitted: &str, solution: &str) -> bool {
    normalize(submitted) == normalize(solution)
}
