//! `no-redeclare`: same-scope redeclaration
//!
//! The symbol table already logs every collision while declarations are
//! inserted; this rule filters and formats them. Collisions with built-in
//! globals only count in scripts, since a module's top-level names never
//! clash with the global object.

use super::Rule;
use crate::analysis::Analysis;
use crate::diagnostic::{Diagnostic, MessageId, RuleName};
use crate::scope::CollisionKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoRedeclareOptions {
    /// Report redeclarations of built-in globals
    pub builtin_globals: bool,
    /// Let legal TypeScript declaration merging pass
    pub ignore_declaration_merge: bool,
}

impl Default for NoRedeclareOptions {
    fn default() -> Self {
        Self {
            builtin_globals: false,
            ignore_declaration_merge: true,
        }
    }
}

pub struct NoRedeclare {
    options: NoRedeclareOptions,
}

impl NoRedeclare {
    pub fn new(options: NoRedeclareOptions) -> Self {
        Self { options }
    }
}

impl Rule for NoRedeclare {
    fn name(&self) -> RuleName {
        RuleName::NoRedeclare
    }

    fn check(&self, analysis: &Analysis) -> Vec<Diagnostic> {
        let honor_builtins = self.options.builtin_globals && !analysis.is_module();
        let mut reported = HashSet::new();
        let mut diagnostics = Vec::new();

        for collision in analysis.table().collisions() {
            let message_id = match collision.kind {
                CollisionKind::RedeclaredAsBuiltin if !honor_builtins => continue,
                CollisionKind::RedeclaredAsBuiltin => MessageId::RedeclaredAsBuiltin,
                CollisionKind::RedeclaredBySyntax => MessageId::RedeclaredBySyntax,
                CollisionKind::Redeclared => MessageId::Redeclared,
            };
            // one report per declaration
            if !reported.insert(collision.declaration) {
                continue;
            }
            let Some(decl) = analysis.declaration(collision.declaration) else {
                continue;
            };
            let Some(site) = decl.site else {
                continue;
            };
            diagnostics.push(Diagnostic::on_token(
                message_id,
                &decl.name,
                site.position,
                site.span,
                None,
            ));
        }

        diagnostics
    }
}
