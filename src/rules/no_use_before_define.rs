//! `no-use-before-define`: references that precede their declaration
//!
//! Works on the resolved bindings. A binding is reported when the reference
//! textually precedes the end of the declaration's name (or sits in the
//! declaration's own initializer) and the declaration kind is one the options
//! ask to check.

use super::Rule;
use crate::analysis::Analysis;
use crate::diagnostic::{Diagnostic, MessageId, RuleName};
use crate::scope::{Reference, ScopeKind};
use crate::symbol::{DeclKind, Declaration, Namespace};
use serde::{Deserialize, Serialize};

/// Which declaration kinds are checked.
///
/// Deserializes from a table, or from the string shorthand `"nofunc"`
/// (defaults with `functions = false`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOptions", rename_all = "camelCase")]
pub struct NoUseBeforeDefineOptions {
    pub functions: bool,
    /// Classes declared in an upper function scope
    pub classes: bool,
    /// Enums declared in an upper function scope
    pub enums: bool,
    /// Variables declared in an upper function scope
    pub variables: bool,
    /// Interfaces and type aliases
    pub typedefs: bool,
    /// Skip references in type-only positions
    pub ignore_type_references: bool,
    /// Skip the local names of `export { name }`
    pub allow_named_exports: bool,
}

impl Default for NoUseBeforeDefineOptions {
    fn default() -> Self {
        Self {
            functions: true,
            classes: true,
            enums: true,
            variables: true,
            typedefs: true,
            ignore_type_references: true,
            allow_named_exports: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Shorthand(String),
    Table(OptionsTable),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OptionsTable {
    functions: Option<bool>,
    classes: Option<bool>,
    enums: Option<bool>,
    variables: Option<bool>,
    typedefs: Option<bool>,
    ignore_type_references: Option<bool>,
    allow_named_exports: Option<bool>,
}

impl TryFrom<RawOptions> for NoUseBeforeDefineOptions {
    type Error = String;

    fn try_from(raw: RawOptions) -> Result<Self, Self::Error> {
        let defaults = Self::default();
        match raw {
            RawOptions::Shorthand(value) if value == "nofunc" => Ok(Self {
                functions: false,
                ..defaults
            }),
            RawOptions::Shorthand(value) => Err(format!(
                "unknown no-use-before-define shorthand {:?}, expected \"nofunc\"",
                value
            )),
            RawOptions::Table(table) => Ok(Self {
                functions: table.functions.unwrap_or(defaults.functions),
                classes: table.classes.unwrap_or(defaults.classes),
                enums: table.enums.unwrap_or(defaults.enums),
                variables: table.variables.unwrap_or(defaults.variables),
                typedefs: table.typedefs.unwrap_or(defaults.typedefs),
                ignore_type_references: table
                    .ignore_type_references
                    .unwrap_or(defaults.ignore_type_references),
                allow_named_exports: table.allow_named_exports.unwrap_or(defaults.allow_named_exports),
            }),
        }
    }
}

pub struct NoUseBeforeDefine {
    options: NoUseBeforeDefineOptions,
}

impl NoUseBeforeDefine {
    pub fn new(options: NoUseBeforeDefineOptions) -> Self {
        Self { options }
    }

    fn is_skipped(&self, analysis: &Analysis, reference: &Reference, decl: &Declaration) -> bool {
        if reference.is_initializing_occurrence {
            return true;
        }
        if self.options.allow_named_exports && reference.is_named_export {
            return true;
        }
        // names used in bare signatures are never evaluated
        if analysis.tree().kind(reference.from_scope) == Some(ScopeKind::FunctionType) {
            return true;
        }
        // decorators and heritage clauses of the class being declared
        if decl.kind == DeclKind::ClassName {
            if let Some(site) = decl.site {
                if site.extent.contains(reference.span) {
                    return true;
                }
            }
        }
        false
    }

    fn is_forbidden(&self, analysis: &Analysis, reference: &Reference, decl: &Declaration) -> bool {
        if self.options.ignore_type_references && reference.is_type_query {
            return false;
        }

        let tree = analysis.tree();
        let is_outer = tree.owner(decl.scope) != tree.owner(reference.from_scope);
        match decl.kind {
            DeclKind::FunctionName | DeclKind::FunctionSignature => self.options.functions,
            DeclKind::ClassName if is_outer => self.options.classes,
            DeclKind::Variable if is_outer => self.options.variables,
            DeclKind::EnumName if is_outer => self.options.enums,
            DeclKind::Interface | DeclKind::TypeAlias => self.options.typedefs,
            _ => true,
        }
    }
}

/// The declaration's name ends before the reference does, and the reference
/// is not a value use inside the declaration's own initializer or defaults
fn is_defined_before_use(reference: &Reference, decl: &Declaration) -> bool {
    let Some(name_span) = decl.span() else {
        return true;
    };
    let in_initializer = reference.namespace == Namespace::Value
        && decl.scope == reference.from_scope
        && decl.initializes_at(reference.span);
    name_span.end < reference.span.end && !in_initializer
}

impl Rule for NoUseBeforeDefine {
    fn name(&self) -> RuleName {
        RuleName::NoUseBeforeDefine
    }

    fn check(&self, analysis: &Analysis) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for binding in analysis.bindings() {
            let (Some(reference), Some(decl)) = (
                analysis.reference(binding.reference),
                analysis.declaration(binding.declaration),
            ) else {
                continue;
            };
            if decl.is_builtin() || self.is_skipped(analysis, reference, decl) {
                continue;
            }
            if is_defined_before_use(reference, decl) || !self.is_forbidden(analysis, reference, decl) {
                continue;
            }
            diagnostics.push(Diagnostic::on_token(
                MessageId::NoUseBeforeDefine,
                &reference.name,
                reference.position,
                reference.span,
                None,
            ));
        }

        diagnostics
    }
}
