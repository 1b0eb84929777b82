//! crates/protocol/src/extension.rs
//!
//! The closed four-tag extension family and its shard-home mapping.

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

/// One of the four supported file-extension families.
///
/// The set is closed by design (spec §3): a client may only ever upload,
/// download, remove, or archive `.c`, `.pdf`, `.txt`, or `.zip` files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// `.c` — owned by the router itself.
    C,
    /// `.pdf` — owned by the shard at virtual root `S2`.
    Pdf,
    /// `.txt` — owned by the shard at virtual root `S3`.
    Txt,
    /// `.zip` — owned by the shard at virtual root `S4`.
    Zip,
}

impl Extension {
    /// All four extensions, in the fixed aggregation order `c, pdf, txt, zip`
    /// (spec §4.2, §5).
    pub const ALL: [Extension; 4] = [
        Extension::C,
        Extension::Pdf,
        Extension::Txt,
        Extension::Zip,
    ];

    /// The lowercase tag used on the wire (`c`, `pdf`, `txt`, `zip`).
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Extension::C => "c",
            Extension::Pdf => "pdf",
            Extension::Txt => "txt",
            Extension::Zip => "zip",
        }
    }

    /// The shard index (`2`, `3`, or `4`) that owns this extension, or
    /// `None` for `C`, which the router owns directly.
    #[must_use]
    pub const fn shard_index(self) -> Option<u8> {
        match self {
            Extension::C => None,
            Extension::Pdf => Some(2),
            Extension::Txt => Some(3),
            Extension::Zip => Some(4),
        }
    }

    /// The virtual root segment (`S1`..`S4`) that owns this extension.
    #[must_use]
    pub const fn home_segment(self) -> &'static str {
        match self {
            Extension::C => "S1",
            Extension::Pdf => "S2",
            Extension::Txt => "S3",
            Extension::Zip => "S4",
        }
    }

    /// Extracts the extension family from a filename's suffix, if any.
    ///
    /// A name with no `.` or a leading dot only (e.g. `.bashrc`) has no
    /// extension and returns `None`, matching the original's
    /// `get_file_extension`.
    #[must_use]
    pub fn from_filename(name: &str) -> Option<Extension> {
        let dot = name.rfind('.')?;
        if dot == 0 {
            return None;
        }
        Extension::from_str(&name[dot + 1..]).ok()
    }
}

impl FromStr for Extension {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Extension::C),
            "pdf" => Ok(Extension::Pdf),
            "txt" => Ok(Extension::Txt),
            "zip" => Ok(Extension::Zip),
            other => Err(ProtocolError::UnsupportedExtension(other.to_string())),
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_tag() {
        for ext in Extension::ALL {
            assert_eq!(Extension::from_str(ext.tag()).unwrap(), ext);
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(Extension::from_str("doc").is_err());
    }

    #[test]
    fn from_filename_finds_last_dot() {
        assert_eq!(Extension::from_filename("archive.tar.zip"), Some(Extension::Zip));
        assert_eq!(Extension::from_filename("note.pdf"), Some(Extension::Pdf));
        assert_eq!(Extension::from_filename("noext"), None);
        assert_eq!(Extension::from_filename(".bashrc"), None);
    }

    #[test]
    fn shard_index_matches_home_mapping() {
        assert_eq!(Extension::C.shard_index(), None);
        assert_eq!(Extension::Pdf.shard_index(), Some(2));
        assert_eq!(Extension::Txt.shard_index(), Some(3));
        assert_eq!(Extension::Zip.shard_index(), Some(4));
    }

    #[test]
    fn aggregation_order_is_c_pdf_txt_zip() {
        let tags: Vec<&str> = Extension::ALL.iter().map(|e| e.tag()).collect();
        assert_eq!(tags, ["c", "pdf", "txt", "zip"]);
    }
}
