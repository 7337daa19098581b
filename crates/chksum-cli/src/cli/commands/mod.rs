//! CLI command handlers.

mod auto;
mod completions;
mod single;

pub use auto::run_auto;
pub use completions::run_completions;
pub use single::run_single;

use chksum_core::{CommandFactory, Services};

use super::presenter;
use super::Settings;

/// Factory wired with the local file system and the configured presenter.
fn factory(settings: &Settings) -> CommandFactory {
    let presenter = presenter::for_format(settings.output, settings.relative_paths);
    CommandFactory::new(Services::local(presenter, settings.workers))
}
