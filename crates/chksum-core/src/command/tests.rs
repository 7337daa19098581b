use super::*;
use crate::digester::digest_bytes;
use crate::error::ErrorKind;
use crate::presenter::{MemoryPresenter, OutcomeSummary};
use std::fs;

struct Harness {
    presenter: Arc<MemoryPresenter>,
    services: Services,
}

impl Harness {
    fn new() -> Self {
        let presenter = Arc::new(MemoryPresenter::new());
        let services = Services::local(presenter.clone(), Some(2));
        Harness { presenter, services }
    }

    fn with_repository(repository: Arc<dyn ChecksumRepository>) -> Self {
        let mut h = Harness::new();
        h.services.repository = repository;
        h
    }

    /// Same digester for single files and for the batch pool.
    fn with_digester(digester: Arc<dyn Digester>) -> Self {
        let mut h = Harness::new();
        h.services.calculator = Arc::new(ThreadPoolCalculator::new(Arc::clone(&digester), 2));
        h.services.digester = digester;
        h
    }

    fn run(&self, kind: CommandKind, targets: &[PathBuf]) -> (CommandResponse, Vec<OutcomeSummary>) {
        let cmd = Command::new(kind, Job::new(targets.to_vec(), self.services.clone()));
        let response = cmd.run();
        (response, self.presenter.take())
    }
}

fn digest(data: &[u8]) -> Checksum {
    digest_bytes(data).unwrap()
}

#[test]
fn kind_parses_case_insensitively() {
    assert_eq!("check".parse::<CommandKind>().unwrap(), CommandKind::Check);
    assert_eq!("DELETE".parse::<CommandKind>().unwrap(), CommandKind::Delete);
    assert!(matches!(
        "verify".parse::<CommandKind>(),
        Err(ChecksumError::UnknownCommand(_))
    ));
}

#[test]
fn compute_reports_without_renaming() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Compute, &[p.clone()]);
    assert!(resp.success);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].verdict, Verdict::Shown);
    assert_eq!(out[0].digest, Some(digest(b"hello")));
    assert_eq!(out[0].previous, Some(Status::NoChecksum));
    assert_eq!(out[0].resulting, Some(Status::NoChecksum));
    assert!(out[0].new_path.is_none());
    assert!(p.exists());
}

#[test]
fn check_without_marker_reports_no_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Check, &[p.clone()]);
    assert!(resp.success);
    assert_eq!(out[0].previous, Some(Status::NoChecksum));
    assert_eq!(out[0].verdict, Verdict::Shown);
    assert!(p.exists());
}

#[test]
fn check_valid_and_invalid_markers() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join(format!("good.{}.txt", digest(b"hello")));
    let bad = dir.path().join(format!("bad.{}.txt", digest(b"hello")));
    fs::write(&good, b"hello").unwrap();
    fs::write(&bad, b"tampered").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Check, &[good.clone(), bad.clone()]);
    assert!(resp.success, "a failed check is a result, not an error");
    assert_eq!(out[0].path, good);
    assert_eq!(out[0].verdict, Verdict::Ok);
    assert_eq!(out[0].resulting, Some(Status::ValidChecksum));
    assert_eq!(out[1].path, bad);
    assert_eq!(out[1].verdict, Verdict::Fail);
    assert_eq!(out[1].resulting, Some(Status::InvalidChecksum));
    assert!(good.exists() && bad.exists());
}

#[test]
fn write_embeds_fresh_digest() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Write, &[p.clone()]);
    assert!(resp.success);
    let expected = dir.path().join("report.0oltwacngevim.txt");
    assert_eq!(out[0].verdict, Verdict::Added);
    assert_eq!(out[0].new_path.as_ref(), Some(&expected));
    assert_eq!(out[0].previous, Some(Status::NoChecksum));
    assert_eq!(out[0].resulting, Some(Status::ValidChecksum));
    assert!(expected.exists());
    assert!(!p.exists());
}

#[test]
fn write_is_idempotent_on_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.0oltwacngevim.txt");
    fs::write(&p, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Write, &[p.clone()]);
    assert!(resp.success);
    assert_eq!(out[0].verdict, Verdict::Unchanged);
    assert!(out[0].new_path.is_none());
    assert!(p.exists());
}

#[test]
fn write_recovers_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.0oltwacngevim.txt");
    fs::write(&p, b"hello!").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Write, &[p.clone()]);
    assert!(resp.success);
    assert_eq!(out[0].previous, Some(Status::InvalidChecksum));
    assert_eq!(out[0].resulting, Some(Status::ValidChecksum));
    assert_eq!(
        out[0].new_path.as_deref(),
        Some(dir.path().join("report.34sfczrn9gvsv.txt").as_path())
    );
}

#[test]
fn delete_strips_valid_and_invalid_markers() {
    let dir = tempfile::tempdir().unwrap();
    let valid = dir.path().join("a.0oltwacngevim.txt");
    let invalid = dir.path().join("b.0oltwacngevim.txt");
    fs::write(&valid, b"hello").unwrap();
    fs::write(&invalid, b"changed").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Delete, &[valid, invalid]);
    assert!(resp.success);
    assert_eq!(out[0].previous, Some(Status::ValidChecksum));
    assert_eq!(out[1].previous, Some(Status::InvalidChecksum));
    for o in &out {
        assert_eq!(o.verdict, Verdict::Deleted);
        assert_eq!(o.resulting, Some(Status::NoChecksum));
    }
    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn delete_without_marker_is_nothing_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Delete, &[p.clone()]);
    assert!(resp.success);
    assert_eq!(out[0].verdict, Verdict::Nothing);
    assert_eq!(out[0].resulting, Some(Status::NoChecksum));
    assert_eq!(out[0].digest, None, "unmarked files are not hashed for delete");
    assert!(p.exists());
}

#[test]
fn missing_file_fails_only_that_file() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.txt");
    let missing = dir.path().join("missing.txt");
    fs::write(&present, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Write, &[missing.clone(), present]);
    assert!(!resp.success);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].path, missing);
    assert_eq!(out[0].verdict, Verdict::Error);
    assert_eq!(out[0].error, Some(ErrorKind::Io));
    assert_eq!(out[1].verdict, Verdict::Added);
    assert!(dir.path().join("present.0oltwacngevim.txt").exists());
}

#[test]
fn conflict_leaves_both_files_alone() {
    let dir = tempfile::tempdir().unwrap();
    let marked = dir.path().join("report.0oltwacngevim.txt");
    let plain = dir.path().join("report.txt");
    fs::write(&marked, b"hello").unwrap();
    fs::write(&plain, b"someone else").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Delete, &[marked.clone()]);
    assert!(!resp.success);
    assert_eq!(out[0].error, Some(ErrorKind::Conflict));
    assert_eq!(out[0].previous, Some(Status::ValidChecksum));
    assert_eq!(out[0].resulting, Some(Status::ValidChecksum));
    assert!(marked.exists());
    assert_eq!(fs::read(&plain).unwrap(), b"someone else");
}

/// Repository that knows every file but refuses all renames.
struct ReadOnlyRepository;

impl ChecksumRepository for ReadOnlyRepository {
    fn read_state(&self, path: &Path) -> Result<FileState, ChecksumError> {
        FileRenamer.read_state(path)
    }

    fn write(&self, path: &Path, _checksum: &Checksum) -> Result<PathBuf, ChecksumError> {
        Err(ChecksumError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn strip(&self, path: &Path) -> Result<PathBuf, ChecksumError> {
        self.write(path, &digest(b""))
    }
}

#[test]
fn failed_write_is_a_self_loop() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let h = Harness::with_repository(Arc::new(ReadOnlyRepository));
    let (resp, out) = h.run(CommandKind::Write, &[p.clone()]);
    assert!(!resp.success);
    assert_eq!(out[0].verdict, Verdict::Error);
    assert_eq!(out[0].previous, Some(Status::NoChecksum));
    assert_eq!(out[0].resulting, Some(Status::NoChecksum));
    assert!(p.exists());
}

/// Digester returning the same checksum for every file.
struct ConstantDigester(Checksum);

impl Digester for ConstantDigester {
    fn compute_digest(&self, _path: &Path) -> Result<Checksum, ChecksumError> {
        Ok(self.0.clone())
    }
}

#[test]
fn single_target_uses_digester_directly() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let mut h = Harness::new();
    let fixed = Checksum::parse("aaaaaaaaaaaaa").unwrap();
    h.services.digester = Arc::new(ConstantDigester(fixed.clone()));
    let (_, out) = h.run(CommandKind::Compute, &[p]);
    assert_eq!(out[0].digest, Some(fixed));
}

/// Digester that can never read the bytes.
struct FailingDigester;

impl Digester for FailingDigester {
    fn compute_digest(&self, path: &Path) -> Result<Checksum, ChecksumError> {
        Err(ChecksumError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "unreadable"),
        })
    }
}

#[test]
fn delete_of_unreadable_unmarked_file_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let one = dir.path().join("report.txt");
    let two = dir.path().join("notes.txt");
    fs::write(&one, b"hello").unwrap();
    fs::write(&two, b"world").unwrap();

    let h = Harness::with_digester(Arc::new(FailingDigester));
    for targets in [vec![one.clone()], vec![one.clone(), two.clone()]] {
        let (resp, out) = h.run(CommandKind::Delete, &targets);
        assert!(resp.success);
        for o in &out {
            assert_eq!(o.verdict, Verdict::Nothing);
            assert_eq!(o.previous, Some(Status::NoChecksum));
            assert_eq!(o.error, None);
        }
    }
    assert!(one.exists() && two.exists());
}

#[test]
fn delete_twice_is_a_no_op_even_when_bytes_become_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let marked = dir.path().join(format!("report.{}.txt", digest(b"hello")));
    let plain = dir.path().join("report.txt");
    fs::write(&marked, b"hello").unwrap();

    let (resp, out) = Harness::new().run(CommandKind::Delete, &[marked.clone()]);
    assert!(resp.success);
    assert_eq!(out[0].verdict, Verdict::Deleted);
    assert_eq!(out[0].new_path.as_ref(), Some(&plain));

    let h = Harness::with_digester(Arc::new(FailingDigester));
    let (resp, out) = h.run(CommandKind::Delete, &[plain.clone()]);
    assert!(resp.success);
    assert_eq!(out[0].verdict, Verdict::Nothing);
    assert!(out[0].new_path.is_none());
    assert!(plain.exists());
}

#[test]
fn check_of_unreadable_unmarked_file_reports_no_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("report.txt");
    fs::write(&p, b"hello").unwrap();

    let h = Harness::with_digester(Arc::new(FailingDigester));
    let (resp, out) = h.run(CommandKind::Check, &[p]);
    assert!(resp.success);
    assert_eq!(out[0].verdict, Verdict::Shown);
    assert_eq!(out[0].previous, Some(Status::NoChecksum));
    assert_eq!(out[0].digest, None);
}

#[test]
fn unreadable_bytes_still_fail_when_the_digest_is_needed() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("report.txt");
    let marked = dir.path().join(format!("notes.{}.txt", digest(b"world")));
    fs::write(&plain, b"hello").unwrap();
    fs::write(&marked, b"world").unwrap();

    let h = Harness::with_digester(Arc::new(FailingDigester));
    for (kind, target) in [
        (CommandKind::Compute, &plain),
        (CommandKind::Write, &plain),
        (CommandKind::Check, &marked),
        (CommandKind::Delete, &marked),
    ] {
        let (resp, out) = h.run(kind, &[target.clone()]);
        assert!(!resp.success, "{kind}");
        assert_eq!(out[0].verdict, Verdict::Error, "{kind}");
        assert_eq!(out[0].error, Some(ErrorKind::Io), "{kind}");
    }
    assert!(plain.exists() && marked.exists());
}
