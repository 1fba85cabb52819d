use std::path::Path;

use crate::error::Result;
use crate::store::files::FileStore;
use crate::store::index::Index;

pub fn run(store_root: &Path) -> Result<()> {
    let store = FileStore::init(store_root)?;
    Index::open(&store.root().join("index.db"))?;

    eprintln!("Initialized .agenda/ in {}", store_root.display());
    Ok(())
}
