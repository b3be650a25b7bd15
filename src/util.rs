//! Small string helpers shared by the store and the play logic.

/// Normalize an answer for comparison: surrounding whitespace removed, lowercased.
pub fn normalize_answer(s: &str) -> String {
  s.trim().to_lowercase()
}

/// Space-tolerant, case-insensitive "contains" used by question search.
///
/// The needle is split on runs of spaces and every piece must appear in the
/// haystack in order, so `"capital  italy"` matches `"Capital of Italy?"`.
/// An empty or all-space needle matches everything.
pub fn matches_search(haystack: &str, needle: &str) -> bool {
  let haystack = haystack.to_lowercase();
  let mut rest = haystack.as_str();
  for piece in needle.split(' ').filter(|p| !p.is_empty()) {
    let piece = piece.to_lowercase();
    match rest.find(&piece) {
      Some(pos) => rest = &rest[pos + piece.len()..],
      None => return false,
    }
  }
  true
}

/// Log-safe truncation for user-supplied strings.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  match s.char_indices().nth(max) {
    None => s.to_string(),
    Some((cut, _)) => format!("{}… ({} bytes total)", &s[..cut], s.len()),
  }
}
