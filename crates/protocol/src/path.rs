//! crates/protocol/src/path.rs
//!
//! Virtual-root path translation: `~/S1/...` as seen by clients becomes
//! `~/S2/...`, `~/S3/...`, or `~/S4/...` as seen by the owning shard.

use crate::Extension;

/// The virtual root segment every client-visible path must begin with.
pub const VIRTUAL_ROOT_SEGMENT: &str = "S1";

/// Rewrites the first occurrence of the `S1` path segment to the segment
/// owned by `ext`, leaving every other path component untouched.
///
/// Operates on plain string content; it is applied identically whether the
/// path is still `~`-prefixed or has already been tilde-expanded, since the
/// shard re-expands on its own end (spec §4.2).
///
/// Idempotent: translating an already-translated path for the same
/// extension is a no-op, because the first path segment is no longer `S1`.
#[must_use]
pub fn translate(path: &str, ext: Extension) -> String {
    let target = ext.home_segment();
    replace_first_segment(path, VIRTUAL_ROOT_SEGMENT, target)
}

/// Replaces the first path component equal to `from` with `to`, searching
/// component-by-component so a prefix match inside a longer name (e.g. a
/// directory literally named `S10`) is never mistaken for the segment.
fn replace_first_segment(path: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut replaced = false;
    let mut start = 0;
    for (idx, ch) in path.char_indices() {
        if ch == '/' {
            push_segment(&mut out, &path[start..idx], from, to, &mut replaced);
            out.push('/');
            start = idx + 1;
        }
    }
    push_segment(&mut out, &path[start..], from, to, &mut replaced);
    out
}

fn push_segment(out: &mut String, segment: &str, from: &str, to: &str, replaced: &mut bool) {
    if !*replaced && segment == from {
        out.push_str(to);
        *replaced = true;
    } else {
        out.push_str(segment);
    }
}

/// Returns `true` if `path`, once tilde-expanded, begins with the virtual
/// root `~/S1` (spec §3 invariant: "a client-visible path always begins
/// with the virtual root `~/S1/`").
#[must_use]
pub fn is_under_virtual_root(path: &str) -> bool {
    path.starts_with("~/S1/") || path == "~/S1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_leading_segment_for_each_extension() {
        assert_eq!(translate("~/S1/docs/a.pdf", Extension::Pdf), "~/S2/docs/a.pdf");
        assert_eq!(translate("~/S1/docs/a.txt", Extension::Txt), "~/S3/docs/a.txt");
        assert_eq!(translate("~/S1/docs/a.zip", Extension::Zip), "~/S4/docs/a.zip");
    }

    #[test]
    fn preserves_remainder_verbatim() {
        assert_eq!(
            translate("~/S1/a/b/c/d.pdf", Extension::Pdf),
            "~/S2/a/b/c/d.pdf"
        );
    }

    #[test]
    fn only_first_occurrence_is_rewritten() {
        assert_eq!(
            translate("~/S1/S1/nested.pdf", Extension::Pdf),
            "~/S2/S1/nested.pdf"
        );
    }

    #[test]
    fn is_idempotent_once_translated() {
        let once = translate("~/S1/docs/a.pdf", Extension::Pdf);
        let twice = translate(&once, Extension::Pdf);
        assert_eq!(once, twice);
    }

    #[test]
    fn does_not_confuse_prefix_segment_names() {
        // A literal directory named "S10" must not be treated as "S1".
        assert_eq!(
            translate("~/S10/docs/a.pdf", Extension::Pdf),
            "~/S10/docs/a.pdf"
        );
    }

    #[test]
    fn recognizes_virtual_root() {
        assert!(is_under_virtual_root("~/S1/x"));
        assert!(is_under_virtual_root("~/S1"));
        assert!(!is_under_virtual_root("~/S2/x"));
        assert!(!is_under_virtual_root("/etc/passwd"));
    }
}
