//! File name encoding: `<base>.<digest><extension>`.
//!
//! The marker is the first `.` (not at position 0) followed by exactly
//! `DIGEST_LEN` base-36 characters and then either the end of the name or
//! another `.`. Everything after the marker is the extension, kept verbatim.
//! Names without such a marker split at their last dot, like `Path::extension`.

use crate::checksum::{Checksum, DIGEST_LEN};

/// Separator between base, marker and extension.
pub const DELIMITER: char = '.';

/// A file name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    pub base: String,
    pub checksum: Option<Checksum>,
    /// Empty, or starts with `.`.
    pub extension: String,
}

impl FileName {
    /// The name with any marker removed.
    pub fn plain(&self) -> String {
        format!("{}{}", self.base, self.extension)
    }

    /// The name carrying `checksum`, replacing any existing marker.
    pub fn with_checksum(&self, checksum: &Checksum) -> String {
        encode(&self.base, &self.extension, checksum)
    }

    /// The name as it was decoded.
    pub fn to_name(&self) -> String {
        match &self.checksum {
            Some(c) => self.with_checksum(c),
            None => self.plain(),
        }
    }
}

/// Build `<base>.<checksum><extension>`.
pub fn encode(base: &str, extension: &str, checksum: &Checksum) -> String {
    format!("{base}{DELIMITER}{checksum}{extension}")
}

/// Split `name` into base, optional marker and extension. Never fails:
/// anything that is not an exact marker decodes as "no checksum".
pub fn decode(name: &str) -> FileName {
    for (i, _) in name.match_indices(DELIMITER) {
        if i == 0 {
            continue;
        }
        let start = i + DELIMITER.len_utf8();
        let Some(candidate) = name.get(start..start + DIGEST_LEN) else {
            continue;
        };
        let rest = &name[start + DIGEST_LEN..];
        if !(rest.is_empty() || rest.starts_with(DELIMITER)) {
            continue;
        }
        if let Ok(checksum) = Checksum::parse(candidate) {
            return FileName {
                base: name[..i].to_string(),
                checksum: Some(checksum),
                extension: rest.to_string(),
            };
        }
    }

    let (base, extension) = split_extension(name);
    FileName {
        base: base.to_string(),
        checksum: None,
        extension: extension.to_string(),
    }
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind(DELIMITER) {
        Some(i) if i > 0 && i + DELIMITER.len_utf8() < name.len() => name.split_at(i),
        _ => (name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> Checksum {
        Checksum::parse(s).unwrap()
    }

    #[test]
    fn decode_marker_between_stem_and_extension() {
        let name = decode("example.abcd1234efgh5.txt");
        assert_eq!(name.base, "example");
        assert_eq!(name.checksum, Some(c("abcd1234efgh5")));
        assert_eq!(name.extension, ".txt");
        assert_eq!(name.plain(), "example.txt");
    }

    #[test]
    fn decode_marker_as_last_suffix() {
        let name = decode("md5.abcd1234efgh5");
        assert_eq!(name.base, "md5");
        assert_eq!(name.checksum, Some(c("abcd1234efgh5")));
        assert_eq!(name.extension, "");
        assert_eq!(name.plain(), "md5");
    }

    #[test]
    fn decode_marker_after_dotfile_base() {
        let name = decode(".dat.abcd1234efgh5");
        assert_eq!(name.base, ".dat");
        assert_eq!(name.checksum, Some(c("abcd1234efgh5")));
        assert_eq!(name.plain(), ".dat");
    }

    #[test]
    fn decode_is_case_insensitive() {
        let name = decode("photo.ABCD1234EFGH5.jpg");
        assert_eq!(name.checksum, Some(c("abcd1234efgh5")));
        assert_eq!(name.to_name(), "photo.abcd1234efgh5.jpg");
    }

    #[test]
    fn decode_without_marker_splits_last_extension() {
        let name = decode("archive.tar.gz");
        assert_eq!(name.base, "archive.tar");
        assert_eq!(name.checksum, None);
        assert_eq!(name.extension, ".gz");

        let name = decode("md5");
        assert_eq!(name.base, "md5");
        assert_eq!(name.extension, "");

        let name = decode(".dat");
        assert_eq!(name.base, ".dat");
        assert_eq!(name.extension, "");

        let name = decode("trailing.");
        assert_eq!(name.base, "trailing.");
        assert_eq!(name.extension, "");
    }

    #[test]
    fn lookalikes_are_not_markers() {
        // Leading dot: the base would be empty.
        assert_eq!(decode(".factorization").checksum, None);
        // Twelve and fourteen chars.
        assert_eq!(decode("file.abcd1234efgh.txt").checksum, None);
        assert_eq!(decode("file.abcd1234efgh56.txt").checksum, None);
        // Outside the alphabet.
        assert_eq!(decode("file.abcd1234efg_5.txt").checksum, None);
        // No separating dot after the candidate.
        assert_eq!(decode("file.abcd1234efgh5x").checksum, None);
        // Non-ASCII right after the delimiter.
        assert_eq!(decode("file.ééééééé.txt").checksum, None);
    }

    #[test]
    fn leftmost_marker_wins() {
        let name = decode("a.aaaaaaaaaaaaa.bbbbbbbbbbbbb");
        assert_eq!(name.base, "a");
        assert_eq!(name.checksum, Some(c("aaaaaaaaaaaaa")));
        assert_eq!(name.extension, ".bbbbbbbbbbbbb");
    }

    #[test]
    fn encode_then_decode_is_lossless() {
        let digest = c("0oltwacngevim");
        for (base, ext) in [
            ("report", ".txt"),
            ("report", ""),
            (".dat", ""),
            ("archive.tar", ".gz"),
            ("with space", ".tar.gz"),
            ("ünïcode", ".md"),
        ] {
            let encoded = encode(base, ext, &digest);
            let decoded = decode(&encoded);
            assert_eq!(decoded.base, base, "{encoded}");
            assert_eq!(decoded.extension, ext, "{encoded}");
            assert_eq!(decoded.checksum.as_ref(), Some(&digest), "{encoded}");
        }
    }

    #[test]
    fn with_checksum_replaces_existing_marker() {
        let name = decode("report.abcd1234efgh5.txt");
        assert_eq!(
            name.with_checksum(&c("0oltwacngevim")),
            "report.0oltwacngevim.txt"
        );
    }
}
