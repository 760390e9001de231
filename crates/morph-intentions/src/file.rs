use crate::history::IntentionHistory;
use crate::types::{GlobalFunctionIntention, GlobalVariableIntention, TypeIntention, TypeIntentionKind};
use crate::Provenance;

/// One output file and everything declared in it.
#[derive(Clone, Debug, PartialEq)]
pub struct FileIntention {
    /// Header the declarations were read from, e.g. `A.h`.
    pub source_path: String,
    /// Swift file to write, e.g. `A.swift`.
    pub target_path: String,
    types: Vec<TypeIntention>,
    global_functions: Vec<GlobalFunctionIntention>,
    global_variables: Vec<GlobalVariableIntention>,
    pub source: Option<Provenance>,
    pub history: IntentionHistory,
}

impl FileIntention {
    pub fn new(source_path: impl Into<String>, target_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            types: Vec::new(),
            global_functions: Vec::new(),
            global_variables: Vec::new(),
            source: None,
            history: IntentionHistory::new(),
        }
    }

    /// A file whose target is `source_path` with its extension replaced by
    /// `.swift`.
    pub fn for_header(source_path: impl Into<String>) -> Self {
        let source_path = source_path.into();
        let stem = match source_path.rfind('.') {
            Some(dot) if !source_path[dot..].contains('/') => &source_path[..dot],
            _ => source_path.as_str(),
        };
        let target_path = format!("{stem}.swift");
        Self::new(source_path, target_path)
    }

    pub fn add_type(&mut self, intention: TypeIntention) {
        self.types.push(intention);
    }

    /// Remove every type intention matching `predicate`.
    pub fn remove_types(&mut self, mut predicate: impl FnMut(&TypeIntention) -> bool) -> usize {
        let before = self.types.len();
        self.types.retain(|ty| !predicate(ty));
        before - self.types.len()
    }

    pub fn add_global_function(&mut self, intention: GlobalFunctionIntention) {
        self.global_functions.push(intention);
    }

    pub fn add_global_variable(&mut self, intention: GlobalVariableIntention) {
        self.global_variables.push(intention);
    }

    pub fn type_intentions(&self) -> &[TypeIntention] {
        &self.types
    }

    pub fn type_intentions_mut(&mut self) -> &mut [TypeIntention] {
        &mut self.types
    }

    pub fn class_intentions(&self) -> impl Iterator<Item = &TypeIntention> {
        self.of_kind(TypeIntentionKind::Class)
    }

    pub fn extension_intentions(&self) -> impl Iterator<Item = &TypeIntention> {
        self.of_kind(TypeIntentionKind::Extension)
    }

    pub fn protocol_intentions(&self) -> impl Iterator<Item = &TypeIntention> {
        self.of_kind(TypeIntentionKind::Protocol)
    }

    fn of_kind(&self, kind: TypeIntentionKind) -> impl Iterator<Item = &TypeIntention> {
        self.types.iter().filter(move |ty| ty.kind == kind)
    }

    pub fn global_functions(&self) -> &[GlobalFunctionIntention] {
        &self.global_functions
    }

    pub fn global_variables(&self) -> &[GlobalVariableIntention] {
        &self.global_variables
    }

    pub fn global_variables_mut(&mut self) -> &mut [GlobalVariableIntention] {
        &mut self.global_variables
    }

    pub fn global_variable(&self, name: &str) -> Option<&GlobalVariableIntention> {
        self.global_variables.iter().find(|var| var.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.global_functions.is_empty() && self.global_variables.is_empty()
    }
}
