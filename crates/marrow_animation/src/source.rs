use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Component, Path, PathBuf};

use marrow_core::{MarrowError, Result};
use rustc_hash::FxHashMap;

use crate::document::SequenceDocument;
use crate::settings::AnimationSettings;

/// Provides sequence documents by name.
///
/// Implementations return [`MarrowError::SequenceNotFound`] when they do not
/// know the name, so the library can fall through to the next source.
pub trait SequenceSource {
    fn load(&self, name: &str) -> Result<SequenceDocument>;
}

/// Reads `<root>/<name>.<extension>` from disk.
#[derive(Debug, Clone)]
pub struct FileSequenceSource {
    root: PathBuf,
    extension: String,
}

impl FileSequenceSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &AnimationSettings) -> Self {
        Self::new(&settings.sequence_root, &settings.sequence_extension)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{}", self.extension))
    }
}

/// A sequence name must be a single plain file stem, so it cannot reach
/// outside the source root.
fn check_sequence_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_file = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );

    if single_file && !name.contains(['/', '\\']) {
        Ok(())
    } else {
        Err(MarrowError::InvalidSequence {
            name: name.to_string(),
            reason: "sequence names may not contain path separators or '..'".to_string(),
        })
    }
}

impl SequenceSource for FileSequenceSource {
    fn load(&self, name: &str) -> Result<SequenceDocument> {
        check_sequence_name(name)?;
        let path = self.path_for(name);
        log::trace!("Loading animation sequence from {}", path.display());

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(MarrowError::SequenceNotFound(name.to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        SequenceDocument::from_reader(BufReader::new(file))
    }
}

/// In-memory documents, keyed by the name they are requested under.
#[derive(Debug, Clone, Default)]
pub struct MemorySequenceSource {
    documents: FxHashMap<String, SequenceDocument>,
}

impl MemorySequenceSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, document: SequenceDocument) {
        self.documents.insert(name.into(), document);
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, document: SequenceDocument) -> Self {
        self.insert(name, document);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SequenceSource for MemorySequenceSource {
    fn load(&self, name: &str) -> Result<SequenceDocument> {
        self.documents
            .get(name)
            .cloned()
            .ok_or_else(|| MarrowError::SequenceNotFound(name.to_string()))
    }
}
