//! Rupee display convention shared by the outcome message and the
//! suggestion prompt: Indian digit grouping, no fraction digits.

use crate::core::{Outcome, Outlook};

pub fn format_inr(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round() as u128;
    let grouped = group_indian(&rounded.to_string());
    if negative {
        format!("-\u{20b9}{grouped}")
    } else {
        format!("\u{20b9}{grouped}")
    }
}

// Last three digits, then pairs: 32,23,24,725.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut parts = Vec::new();
    let mut end = head.len();
    while end > 2 {
        parts.push(&head[end - 2..end]);
        end -= 2;
    }
    parts.push(&head[..end]);
    parts.reverse();
    format!("{},{}", parts.join(","), tail)
}

/// Textual outcome rendered for the display layer and echoed into the
/// suggestion prompt.
pub fn outcome_message(outlook: &Outlook) -> String {
    match outlook.outcome {
        Outcome::Surplus => format!(
            "Congratulations! Your estimated retirement corpus of {} is sufficient. \
             You have a surplus of {}.",
            format_inr(outlook.accumulated_corpus),
            format_inr(outlook.magnitude()),
        ),
        Outcome::Deficit => format!(
            "Warning: Your estimated retirement corpus of {} is not sufficient. \
             You need an additional {} to meet your retirement goals.",
            format_inr(outlook.accumulated_corpus),
            format_inr(outlook.magnitude()),
        ),
    }
}
