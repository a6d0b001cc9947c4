//! tabq ui command implementation

use tokio::runtime::Runtime;

use crate::browser::CdpHost;
use crate::error::Result;
use crate::store::TaskStore;
use crate::tui;

pub struct Options {
    pub store: TaskStore,
    pub host: CdpHost,
    pub runtime: Runtime,
}

pub fn run(opts: Options) -> Result<()> {
    tui::run(opts.store, opts.host, opts.runtime)
}
