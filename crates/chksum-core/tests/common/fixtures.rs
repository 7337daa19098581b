//! Scratch directory with a wired command factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chksum_core::presenter::{MemoryPresenter, OutcomeSummary};
use chksum_core::{CommandFactory, CommandKind, CommandRequest, CommandResponse, Services};
use tempfile::TempDir;

pub struct Workspace {
    pub dir: TempDir,
    pub presenter: Arc<MemoryPresenter>,
    pub factory: CommandFactory,
}

impl Workspace {
    pub fn new() -> Self {
        let presenter = Arc::new(MemoryPresenter::new());
        let factory = CommandFactory::new(Services::local(presenter.clone(), Some(4)));
        Workspace {
            dir: tempfile::tempdir().unwrap(),
            presenter,
            factory,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let p = self.path(name);
        std::fs::write(&p, contents).unwrap();
        p
    }

    /// Run one command and return its response and outcomes.
    pub fn run<P: AsRef<Path>>(
        &self,
        kind: CommandKind,
        targets: &[P],
    ) -> (CommandResponse, Vec<OutcomeSummary>) {
        let cmd = self
            .factory
            .create(CommandRequest {
                kind,
                targets: targets.iter().map(|p| p.as_ref().to_path_buf()).collect(),
            })
            .unwrap();
        let response = cmd.run();
        (response, self.presenter.take())
    }

    /// Names of all files in the scratch directory, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
