use std::path::Path;

use tracing::instrument;

use crate::context::Context;
use crate::dispatch::{is_known_type, resolve_source};
use crate::error::{Error, Result};
use crate::handler::{ChildObject, Handler};
use crate::record::{FileRecord, Manifest};
use crate::source::ByteSource;

/// The flattened, parent-linked manifest of one input.
///
/// The walk is pre-order: an archive's record comes before the records of
/// everything inside it, members in listing order. Any failure aborts the
/// whole walk.
#[derive(Debug)]
pub struct Package {
    manifest: Manifest,
}

impl Package {
    #[instrument(skip(ctx, path), fields(path = %path.as_ref().display()))]
    pub fn build(ctx: &Context, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let root = ChildObject::root(path.to_string_lossy(), ByteSource::Path(path.to_path_buf()));
        Self::walk_root(ctx, root)
    }

    /// Walk a buffer as if it were a file called `name`.
    #[instrument(skip(ctx, name, bytes), fields(name = %name.as_ref(), len = bytes.len()))]
    pub fn from_bytes(ctx: &Context, name: impl AsRef<str>, bytes: Vec<u8>) -> Result<Self> {
        let root = ChildObject::root(name.as_ref(), ByteSource::Memory(bytes));
        Self::walk_root(ctx, root)
    }

    fn walk_root(ctx: &Context, root: ChildObject) -> Result<Self> {
        let mut manifest = Manifest::new();
        walk(ctx, &root, 0, &mut manifest)?;
        tracing::debug!(records = manifest.len(), "Walk complete");
        Ok(Self { manifest })
    }

    pub fn manifest(&self) -> &Manifest { &self.manifest }

    pub fn into_manifest(self) -> Manifest { self.manifest }

    pub fn root(&self) -> Option<&FileRecord> { self.manifest.root() }
}

fn walk(ctx: &Context, node: &ChildObject, depth: usize, out: &mut Manifest) -> Result<()> {
    let options = ctx.options();
    let resolution = resolve_source(&node.name, &node.source)?;

    if depth > 0 && !options.process_all_files && !resolution.is_archive() && !is_known_type(&node.name)
    {
        tracing::trace!(name = %node.name, "Skipping member of unknown type");
        return Ok(());
    }
    if depth > options.max_depth {
        return Err(Error::DepthExceeded {
            name:  node.name.clone(),
            limit: options.max_depth,
        });
    }

    let mut handler = Handler::build(ctx, resolution, node)?;
    tracing::debug!(name = %node.name, handler = %handler.kind(), depth, "Recorded");
    out.push(handler.describe());

    if let Handler::Archive(archive) = &mut handler {
        for child in archive.child_objects()? {
            walk(ctx, &child, depth + 1, out)?;
        }
    }
    Ok(())
}
