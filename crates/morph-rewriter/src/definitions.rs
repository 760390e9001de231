//! Named definitions visible to expressions: global variables and functions.

use morph_ast::SwiftType;
use morph_intentions::{FileIntention, IntentionCollection};
use morph_types::{FunctionSignature, ValueStorage};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum CodeDefinitionKind {
    Variable(ValueStorage),
    Function(FunctionSignature),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodeDefinition {
    pub name: String,
    pub kind: CodeDefinitionKind,
}

impl CodeDefinition {
    pub fn variable(name: impl Into<String>, storage: ValueStorage) -> Self {
        Self {
            name: name.into(),
            kind: CodeDefinitionKind::Variable(storage),
        }
    }

    pub fn function(signature: FunctionSignature) -> Self {
        Self {
            name: signature.name.clone(),
            kind: CodeDefinitionKind::Function(signature),
        }
    }

    /// Type of a variable definition.
    pub fn variable_type(&self) -> Option<&SwiftType> {
        match &self.kind {
            CodeDefinitionKind::Variable(storage) => Some(&storage.ty),
            CodeDefinitionKind::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionSignature> {
        match &self.kind {
            CodeDefinitionKind::Function(signature) => Some(signature),
            CodeDefinitionKind::Variable(_) => None,
        }
    }
}

/// Something that can be asked for definitions by name.
pub trait DefinitionsSource: Send + Sync {
    /// The first variable definition called `name`.
    fn variable_named(&self, name: &str) -> Option<&CodeDefinition>;

    /// Every function definition called `name`, in declaration order.
    fn functions_named(&self, name: &str) -> Vec<&CodeDefinition>;
}

/// A fixed list of definitions.
#[derive(Clone, Debug, Default)]
pub struct ArrayDefinitionsSource {
    definitions: Vec<CodeDefinition>,
}

impl ArrayDefinitionsSource {
    pub fn new(definitions: Vec<CodeDefinition>) -> Self {
        Self { definitions }
    }

    /// The global variables and functions declared in `file`.
    pub fn from_file(file: &FileIntention) -> Self {
        let mut definitions = Vec::new();
        for var in file.global_variables() {
            definitions.push(CodeDefinition::variable(var.name.as_str(), var.storage.clone()));
        }
        for func in file.global_functions() {
            definitions.push(CodeDefinition::function(func.signature.clone()));
        }
        Self { definitions }
    }

    pub fn definitions(&self) -> &[CodeDefinition] {
        &self.definitions
    }
}

impl DefinitionsSource for ArrayDefinitionsSource {
    fn variable_named(&self, name: &str) -> Option<&CodeDefinition> {
        self.definitions
            .iter()
            .find(|def| def.name == name && def.variable_type().is_some())
    }

    fn functions_named(&self, name: &str) -> Vec<&CodeDefinition> {
        self.definitions
            .iter()
            .filter(|def| def.name == name && def.as_function().is_some())
            .collect()
    }
}

/// Index of every global declared across an intention collection.
///
/// A snapshot: rebuild it after the collection changes.
#[derive(Clone, Debug, Default)]
pub struct IntentionGlobals {
    variables: FxHashMap<String, CodeDefinition>,
    functions: FxHashMap<String, Vec<CodeDefinition>>,
}

impl IntentionGlobals {
    pub fn index(intentions: &IntentionCollection) -> Self {
        let mut globals = Self::default();
        for file in intentions.file_intentions() {
            for var in file.global_variables() {
                globals
                    .variables
                    .entry(var.name.clone())
                    .or_insert_with(|| CodeDefinition::variable(var.name.as_str(), var.storage.clone()));
            }
            for func in file.global_functions() {
                globals
                    .functions
                    .entry(func.signature.name.clone())
                    .or_default()
                    .push(CodeDefinition::function(func.signature.clone()));
            }
        }
        globals
    }

    pub fn len(&self) -> usize {
        self.variables.len() + self.functions.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DefinitionsSource for IntentionGlobals {
    fn variable_named(&self, name: &str) -> Option<&CodeDefinition> {
        self.variables.get(name)
    }

    fn functions_named(&self, name: &str) -> Vec<&CodeDefinition> {
        self.functions
            .get(name)
            .map(|defs| defs.iter().collect())
            .unwrap_or_default()
    }
}

/// Sources searched in order; the first one with an answer wins.
pub struct CompoundDefinitionsSource<'a> {
    sources: Vec<&'a dyn DefinitionsSource>,
}

impl<'a> CompoundDefinitionsSource<'a> {
    pub fn new(sources: Vec<&'a dyn DefinitionsSource>) -> Self {
        Self { sources }
    }
}

impl DefinitionsSource for CompoundDefinitionsSource<'_> {
    fn variable_named(&self, name: &str) -> Option<&CodeDefinition> {
        self.sources.iter().find_map(|source| source.variable_named(name))
    }

    fn functions_named(&self, name: &str) -> Vec<&CodeDefinition> {
        self.sources
            .iter()
            .map(|source| source.functions_named(name))
            .find(|defs| !defs.is_empty())
            .unwrap_or_default()
    }
}
