//! Per-file analysis
//!
//! Drives the scope tree builder, the symbol table and the reference
//! collector through one traversal of a syntax tree, then runs the resolver.
//! The resulting `Analysis` is immutable and is all the rules look at.

mod patterns;
mod walker;

use crate::binding::Binding;
use crate::scope::{RefId, Reference, Resolver, ScopeKind, ScopeTree, SymbolTable, TypeOracle};
use crate::symbol::{DeclId, Declaration, HoistPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tree_sitter::Tree;
use walker::Walker;

/// Where `var` declarations are bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarScoping {
    /// Every declaration binds in the scope it appears in
    #[default]
    Lexical,
    /// `var` binds in the nearest function, module or global scope
    Function,
}

impl VarScoping {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarScoping::Lexical => "lexical",
            VarScoping::Function => "function",
        }
    }
}

/// Knobs that change how the symbol table is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub var_scoping: VarScoping,
    /// Allow legal TypeScript declaration merging without a collision
    pub ignore_declaration_merge: bool,
    /// Decides `Declaration::hoistable`
    pub hoist: HoistPolicy,
    /// Pre-register built-in globals in the root scope
    pub builtin_globals: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            var_scoping: VarScoping::default(),
            ignore_declaration_merge: true,
            hoist: HoistPolicy::default(),
            builtin_globals: false,
        }
    }
}

/// Scopes, declarations, references and bindings of one file
#[derive(Debug)]
pub struct Analysis {
    tree: ScopeTree,
    table: SymbolTable,
    references: Vec<Reference>,
    bindings: Vec<Binding>,
    /// Resolved declaration per reference, indexed by `RefId`
    resolutions: Vec<Option<DeclId>>,
    final_depth: usize,
}

impl Analysis {
    pub fn tree(&self) -> &ScopeTree {
        &self.tree
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn reference(&self, id: RefId) -> Option<&Reference> {
        self.references.get(id.0 as usize)
    }

    pub fn declaration(&self, id: DeclId) -> Option<&Declaration> {
        self.table.get(id)
    }

    /// Declaration a reference resolved to
    pub fn resolved(&self, id: RefId) -> Option<&Declaration> {
        self.resolutions
            .get(id.0 as usize)
            .copied()
            .flatten()
            .and_then(|decl| self.declaration(decl))
    }

    pub fn is_module(&self) -> bool {
        self.tree.root().kind == ScopeKind::Module
    }

    /// Active scopes left after the traversal; always 1
    pub fn final_depth(&self) -> usize {
        self.final_depth
    }
}

/// Analyze a parsed file
pub fn analyze(tree: &Tree, source: &str, options: &AnalysisOptions, oracle: Option<&dyn TypeOracle>) -> Analysis {
    let root = tree.root_node();
    let mut walker = Walker::new(root, source.as_bytes(), options, oracle);
    walker.walk(root);
    let final_depth = walker.depth();
    let result = walker.finish();

    let bindings = Resolver::new(&result.scopes, &result.table).resolve_all(&result.references);
    debug!(
        "Analyzed {} scopes, {} declarations, {} references ({} bound)",
        result.scopes.len(),
        result.table.declarations().len(),
        result.references.len(),
        bindings.len()
    );

    let mut resolutions = vec![None; result.references.len()];
    for binding in &bindings {
        if let Some(slot) = resolutions.get_mut(binding.reference.0 as usize) {
            *slot = Some(binding.declaration);
        }
    }

    Analysis {
        tree: result.scopes,
        table: result.table,
        references: result.references,
        bindings,
        resolutions,
        final_depth,
    }
}
