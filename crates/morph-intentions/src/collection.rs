use crate::file::FileIntention;
use crate::types::TypeIntention;

/// Every file the rewriter intends to emit, in insertion order.
///
/// Type queries flatten across files on every call; nothing is cached.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntentionCollection {
    files: Vec<FileIntention>,
}

impl IntentionCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file_intentions(&self) -> &[FileIntention] {
        &self.files
    }

    pub fn file_intentions_mut(&mut self) -> &mut [FileIntention] {
        &mut self.files
    }

    pub fn type_intentions(&self) -> Vec<&TypeIntention> {
        self.files.iter().flat_map(|file| file.type_intentions()).collect()
    }

    pub fn class_intentions(&self) -> Vec<&TypeIntention> {
        self.files.iter().flat_map(|file| file.class_intentions()).collect()
    }

    pub fn extension_intentions(&self) -> Vec<&TypeIntention> {
        self.files
            .iter()
            .flat_map(|file| file.extension_intentions())
            .collect()
    }

    pub fn protocol_intentions(&self) -> Vec<&TypeIntention> {
        self.files
            .iter()
            .flat_map(|file| file.protocol_intentions())
            .collect()
    }

    /// Every type intention called `name`, across all files.
    pub fn type_intentions_named(&self, name: &str) -> Vec<&TypeIntention> {
        self.files
            .iter()
            .flat_map(|file| file.type_intentions())
            .filter(|ty| ty.type_name == name)
            .collect()
    }

    /// The first file whose source path is `path`.
    pub fn intention_for(&self, path: &str) -> Option<&FileIntention> {
        self.files.iter().find(|file| file.source_path == path)
    }

    pub fn intention_for_mut(&mut self, path: &str) -> Option<&mut FileIntention> {
        self.files.iter_mut().find(|file| file.source_path == path)
    }

    pub fn add_intention(&mut self, file: FileIntention) {
        self.files.push(file);
    }

    /// Remove the first file matching `predicate`.
    pub fn remove_intention(&mut self, predicate: impl Fn(&FileIntention) -> bool) -> Option<FileIntention> {
        let index = self.files.iter().position(predicate)?;
        Some(self.files.remove(index))
    }

    /// Remove every file matching `predicate`, returning how many went.
    pub fn remove_intentions(&mut self, predicate: impl Fn(&FileIntention) -> bool) -> usize {
        let before = self.files.len();
        self.files.retain(|file| !predicate(file));
        before - self.files.len()
    }
}
