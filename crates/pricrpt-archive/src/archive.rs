//! Nested zip archive reading.
//!
//! A daily price report is an outer zip that embeds exactly one inner zip;
//! the inner zip holds the candidate snapshot documents.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

use crate::lineage::digest_reader;

const INNER_ARCHIVE_EXT: &str = ".zip";

/// Errors that can occur while reading a nested archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Failed to open the outer archive file.
    #[error("Failed to open archive '{path}': {source}")]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The outer or inner archive is not a readable zip.
    #[error("Malformed archive '{archive}': {source}")]
    Zip {
        /// Name of the outer archive.
        archive: String,
        /// The underlying zip error.
        source: ZipError,
    },

    /// The outer archive embeds no inner archive.
    #[error("No inner archive in '{archive}'")]
    NoInnerArchive {
        /// Name of the outer archive.
        archive: String,
    },

    /// The outer archive embeds more than one inner archive.
    #[error("Expected one inner archive in '{archive}', found {}: {}", .names.len(), .names.join(", "))]
    MultipleInnerArchives {
        /// Name of the outer archive.
        archive: String,
        /// Names of the embedded archives.
        names: Vec<String>,
    },

    /// Failed to read a member.
    #[error("Failed to read '{member}' in '{archive}': {source}")]
    Read {
        /// Name of the outer archive.
        archive: String,
        /// Name of the member being read.
        member: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// An outer archive whose single inner archive has been loaded into memory.
///
/// The outer file handle is released as soon as the inner archive bytes are
/// read; the inner archive lives as long as this value.
pub struct NestedArchive {
    outer_name: String,
    inner_name: String,
    inner: ZipArchive<Cursor<Vec<u8>>>,
}

impl std::fmt::Debug for NestedArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedArchive")
            .field("outer_name", &self.outer_name)
            .field("inner_name", &self.inner_name)
            .field("members", &self.inner.len())
            .finish()
    }
}

impl NestedArchive {
    /// Opens an outer archive file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, either archive is
    /// malformed, or the outer archive does not embed exactly one inner
    /// archive.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let outer_name = pricrpt_types::file_name(path);
        let file = File::open(path).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_outer(outer_name, BufReader::new(file))
    }

    /// Reads an outer archive already held in memory.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open), minus the file error.
    pub fn from_bytes(outer_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        Self::from_outer(outer_name.into(), Cursor::new(bytes))
    }

    fn from_outer<R: Read + Seek>(outer_name: String, reader: R) -> Result<Self, ArchiveError> {
        let zip_err = |source| ArchiveError::Zip {
            archive: outer_name.clone(),
            source,
        };

        let mut outer = ZipArchive::new(reader).map_err(zip_err)?;
        let mut candidates = names_matching(&outer, |name| has_suffix(name, INNER_ARCHIVE_EXT));
        let inner_name = match candidates.len() {
            0 => {
                return Err(ArchiveError::NoInnerArchive {
                    archive: outer_name.clone(),
                });
            }
            1 => candidates.remove(0),
            _ => {
                return Err(ArchiveError::MultipleInnerArchives {
                    archive: outer_name.clone(),
                    names: candidates,
                });
            }
        };

        let mut inner_bytes = Vec::new();
        {
            let mut member = outer.by_name(&inner_name).map_err(zip_err)?;
            member
                .read_to_end(&mut inner_bytes)
                .map_err(|source| ArchiveError::Read {
                    archive: outer_name.clone(),
                    member: inner_name.clone(),
                    source,
                })?;
        }
        drop(outer);

        let inner = ZipArchive::new(Cursor::new(inner_bytes)).map_err(zip_err)?;
        tracing::debug!(
            archive = %outer_name,
            inner = %inner_name,
            members = inner.len(),
            "opened inner archive"
        );

        Ok(Self {
            outer_name,
            inner_name,
            inner,
        })
    }

    /// Returns the outer archive file name.
    #[must_use]
    pub fn outer_name(&self) -> &str {
        &self.outer_name
    }

    /// Returns the embedded archive's member name.
    #[must_use]
    pub fn inner_name(&self) -> &str {
        &self.inner_name
    }

    /// Returns inner member names accepted by `predicate`, in archive order.
    pub fn member_names(&self, predicate: impl Fn(&str) -> bool) -> Vec<String> {
        names_matching(&self.inner, predicate)
    }

    /// Returns inner member names ending with `suffix` (case-insensitive).
    #[must_use]
    pub fn documents(&self, suffix: &str) -> Vec<String> {
        self.member_names(|name| has_suffix(name, suffix))
    }

    /// Opens a readable stream over one inner member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member does not exist or cannot be opened.
    pub fn open_member(&mut self, name: &str) -> Result<impl Read + '_, ArchiveError> {
        self.inner.by_name(name).map_err(|source| ArchiveError::Zip {
            archive: self.outer_name.clone(),
            source,
        })
    }

    /// Reads at most `limit` bytes from the start of a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the member cannot be opened or read.
    pub fn read_head(&mut self, name: &str, limit: usize) -> Result<Vec<u8>, ArchiveError> {
        let archive = self.outer_name.clone();
        let member = self.open_member(name)?;
        let mut head = Vec::with_capacity(limit.min(1 << 20));
        member
            .take(limit as u64)
            .read_to_end(&mut head)
            .map_err(|source| ArchiveError::Read {
                archive,
                member: name.to_string(),
                source,
            })?;
        Ok(head)
    }

    /// Computes the SHA-256 hex digest of a member, reading `chunk_size`
    /// bytes at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the member cannot be opened or read.
    pub fn member_digest(&mut self, name: &str, chunk_size: usize) -> Result<String, ArchiveError> {
        let archive = self.outer_name.clone();
        let member = self.open_member(name)?;
        digest_reader(member, chunk_size).map_err(|source| ArchiveError::Read {
            archive,
            member: name.to_string(),
            source,
        })
    }
}

/// Case-insensitive suffix match on ASCII extensions.
pub(crate) fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.as_bytes()[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

fn names_matching<R: Read + Seek>(
    archive: &ZipArchive<R>,
    predicate: impl Fn(&str) -> bool,
) -> Vec<String> {
    (0..archive.len())
        .filter_map(|idx| archive.name_for_index(idx))
        .filter(|name| !name.ends_with('/') && predicate(name))
        .map(str::to_string)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_support::{nested_bytes, zip_bytes};
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lists_documents_in_archive_order() {
        let bytes = nested_bytes(
            "PR210104.zip",
            &[("b_2.xml", "<a/>"), ("readme.txt", "x"), ("a_1.XML", "<a/>")],
        );
        let archive = NestedArchive::from_bytes("PR210104_20210104.zip", bytes).unwrap();
        assert_eq!(archive.outer_name(), "PR210104_20210104.zip");
        assert_eq!(archive.inner_name(), "PR210104.zip");
        assert_eq!(archive.documents(".xml"), vec!["b_2.xml", "a_1.XML"]);
        assert_eq!(
            archive.member_names(|name| name.starts_with("read")),
            vec!["readme.txt"]
        );
    }

    #[test]
    fn test_read_head_is_bounded() {
        let text = "0123456789".repeat(10);
        let bytes = nested_bytes("in.zip", &[("doc.xml", &text)]);
        let mut archive = NestedArchive::from_bytes("out_20210104.zip", bytes).unwrap();
        assert_eq!(archive.read_head("doc.xml", 15).unwrap(), b"012345678901234");
        assert_eq!(archive.read_head("doc.xml", 1000).unwrap().len(), 100);
    }

    #[test]
    fn test_open_member_streams_content() {
        let bytes = nested_bytes("in.zip", &[("doc.xml", "<root/>")]);
        let mut archive = NestedArchive::from_bytes("out.zip", bytes).unwrap();
        let mut text = String::new();
        archive
            .open_member("doc.xml")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "<root/>");
    }

    #[test]
    fn test_member_digest() {
        let bytes = nested_bytes("in.zip", &[("doc.xml", "abc")]);
        let mut archive = NestedArchive::from_bytes("out.zip", bytes).unwrap();
        assert_eq!(
            archive.member_digest("doc.xml", 1).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_member() {
        let bytes = nested_bytes("in.zip", &[("doc.xml", "abc")]);
        let mut archive = NestedArchive::from_bytes("out.zip", bytes).unwrap();
        assert!(matches!(
            archive.read_head("other.xml", 10),
            Err(ArchiveError::Zip { .. })
        ));
    }

    #[test]
    fn test_no_inner_archive() {
        let bytes = zip_bytes(&[("doc.xml", b"<a/>")]);
        let result = NestedArchive::from_bytes("out.zip", bytes);
        assert!(matches!(result, Err(ArchiveError::NoInnerArchive { .. })));
    }

    #[test]
    fn test_multiple_inner_archives_fail_loudly() {
        let inner = zip_bytes(&[("doc.xml", b"<a/>")]);
        let bytes = zip_bytes(&[("one.zip", &inner), ("two.ZIP", &inner)]);
        match NestedArchive::from_bytes("out.zip", bytes) {
            Err(ArchiveError::MultipleInnerArchives { archive, names }) => {
                assert_eq!(archive, "out.zip");
                assert_eq!(names, vec!["one.zip", "two.ZIP"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_not_a_zip() {
        let result = NestedArchive::from_bytes("out.zip", b"not a zip".to_vec());
        assert!(matches!(result, Err(ArchiveError::Zip { .. })));
    }

    #[test]
    fn test_inner_not_a_zip() {
        let bytes = zip_bytes(&[("inner.zip", b"garbage")]);
        let result = NestedArchive::from_bytes("out.zip", bytes);
        assert!(matches!(result, Err(ArchiveError::Zip { .. })));
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PR210104_20210104.zip");
        let mut file = File::create(&path).unwrap();
        file.write_all(&nested_bytes("in.zip", &[("doc.xml", "<a/>")]))
            .unwrap();
        drop(file);

        let archive = NestedArchive::open(&path).unwrap();
        assert_eq!(archive.outer_name(), "PR210104_20210104.zip");
        assert_eq!(archive.documents(".xml"), vec!["doc.xml"]);
    }

    #[test]
    fn test_open_missing_file() {
        let result = NestedArchive::open(Path::new("/nonexistent/x_20210104.zip"));
        assert!(matches!(result, Err(ArchiveError::Open { .. })));
    }

    #[test]
    fn test_has_suffix() {
        assert!(has_suffix("a.XML", ".xml"));
        assert!(has_suffix(".xml", ".xml"));
        assert!(!has_suffix("xml", ".xml"));
        assert!(!has_suffix("a.xml.bak", ".xml"));
    }
}
