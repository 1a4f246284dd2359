//! Harlowe position descriptors.
//!
//! Harlowe addresses sequence elements by ordinal ("1st", "3rd"), from the
//! end ("last", "2ndlast"), or by bare 1-based number.

const ORDINAL_SUFFIXES: [&str; 4] = ["st", "nd", "rd", "th"];

/// Resolve `descriptor` to a 0-based index into a sequence of `length`
/// elements. `None` when the descriptor is not a position or falls outside
/// the sequence.
pub fn position_to_index(descriptor: &str, length: usize) -> Option<usize> {
    let descriptor = descriptor.trim();

    if descriptor.eq_ignore_ascii_case("last") {
        return length.checked_sub(1);
    }

    if let Some(ordinal) = strip_suffix_ignore_case(descriptor, "last") {
        let from_end = parse_ordinal(ordinal)?;
        return length.checked_sub(from_end);
    }

    let position = parse_ordinal(descriptor).or_else(|| parse_bare(descriptor))?;
    let index = position - 1;
    (index < length).then_some(index)
}

/// "1st", "22nd", "4th": a positive number followed by any ordinal suffix.
/// Suffixes are not checked against the number, so "2th" is accepted.
fn parse_ordinal(text: &str) -> Option<usize> {
    let digits = ORDINAL_SUFFIXES
        .iter()
        .find_map(|suffix| strip_suffix_ignore_case(text, suffix))?;
    parse_bare(digits)
}

fn parse_bare(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<usize>().ok().filter(|n| *n > 0)
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}
