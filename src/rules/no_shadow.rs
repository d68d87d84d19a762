//! `no-shadow`: declarations hiding a same-named outer declaration
//!
//! For every declaration the enclosing scopes are searched outward for a
//! same-named declaration; the nearest one is the shadowed candidate. A fixed
//! list of exemptions decides whether the pair is reported.

use super::Rule;
use crate::analysis::Analysis;
use crate::diagnostic::{Diagnostic, MessageId, RuleName};
use crate::scope::ScopeKind;
use crate::symbol::{DeclKind, Declaration, HoistPolicy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoShadowOptions {
    /// Names that may always shadow
    pub allow: Vec<String>,
    /// Report shadowing of built-in globals
    pub builtin_globals: bool,
    /// Which outer declarations count before their textual position
    pub hoist: HoistPolicy,
    /// Parameters of function types may reuse value names
    pub ignore_function_type_parameter_name_value_shadow: bool,
    /// Ignore declarations inside a function nested in the outer initializer
    pub ignore_on_initialization: bool,
    /// A type never shadows a value and vice versa
    pub ignore_type_value_shadow: bool,
}

impl Default for NoShadowOptions {
    fn default() -> Self {
        Self {
            allow: Vec::new(),
            builtin_globals: false,
            hoist: HoistPolicy::default(),
            ignore_function_type_parameter_name_value_shadow: true,
            ignore_on_initialization: false,
            ignore_type_value_shadow: true,
        }
    }
}

pub struct NoShadow {
    options: NoShadowOptions,
}

impl NoShadow {
    pub fn new(options: NoShadowOptions) -> Self {
        Self { options }
    }

    fn is_exempt(&self, analysis: &Analysis, inner: &Declaration, outer: &Declaration) -> bool {
        let tree = analysis.tree();

        if outer.is_builtin() && !self.options.builtin_globals {
            return true;
        }

        if self.options.ignore_type_value_shadow && inner.namespaces.is_value() != outer.namespaces.is_value() {
            return true;
        }

        if self.options.ignore_function_type_parameter_name_value_shadow
            && inner.kind == DeclKind::Parameter
            && tree.kind(inner.scope) == Some(ScopeKind::FunctionType)
            && outer.namespaces.is_value()
        {
            return true;
        }

        // an outer declaration that is not hoisted does not exist yet
        if let (Some(inner_span), Some(outer_span)) = (inner.span(), outer.span()) {
            if !outer.hoistable && inner_span.precedes(outer_span) {
                return true;
            }
        }

        if self.options.ignore_on_initialization && is_in_initializer(analysis, inner, outer) {
            return true;
        }

        false
    }
}

impl Rule for NoShadow {
    fn name(&self) -> RuleName {
        RuleName::NoShadow
    }

    fn check(&self, analysis: &Analysis) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for inner in analysis.table().declarations() {
            if !inner.kind.can_shadow() || inner.self_binding {
                continue;
            }
            let Some(site) = inner.site else {
                continue;
            };
            if self.options.allow.iter().any(|name| name == &inner.name) {
                continue;
            }
            let Some((outer, crosses_augmentation)) = nearest_outer(analysis, inner) else {
                continue;
            };
            if crosses_augmentation || self.is_exempt(analysis, inner, outer) {
                continue;
            }

            let diagnostic = if outer.is_builtin() {
                Diagnostic::on_token(MessageId::NoShadowGlobal, &inner.name, site.position, site.span, None)
            } else {
                Diagnostic::on_token(
                    MessageId::NoShadow,
                    &inner.name,
                    site.position,
                    site.span,
                    outer.position(),
                )
            };
            diagnostics.push(diagnostic);
        }

        diagnostics
    }
}

/// Nearest same-named declaration in a strictly enclosing scope, and whether
/// the search left a `declare global` block on the way
fn nearest_outer<'a>(analysis: &'a Analysis, inner: &Declaration) -> Option<(&'a Declaration, bool)> {
    let tree = analysis.tree();
    let is_augmentation = |scope| tree.get(scope).is_some_and(|s| s.global_augmentation);

    let mut crossed = is_augmentation(inner.scope);
    let mut current = tree.parent(inner.scope);
    while let Some(scope) = current {
        if let Some(outer) = analysis
            .table()
            .lookup_any_local(scope, &inner.name, inner.namespaces)
        {
            return Some((outer, crossed));
        }
        crossed |= is_augmentation(scope);
        current = tree.parent(scope);
    }
    None
}

/// `const a = list.map(a => a)`: the inner declaration lives in a function
/// nested inside the outer declaration's initializer
fn is_in_initializer(analysis: &Analysis, inner: &Declaration, outer: &Declaration) -> bool {
    let (Some(init), Some(inner_span)) = (outer.init_range, inner.span()) else {
        return false;
    };
    let tree = analysis.tree();
    init.contains(inner_span) && tree.owner(inner.scope) != tree.owner(outer.scope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisOptions;
    use crate::position::Position;
    use crate::rules::test_support::analyze_ts;

    fn check_with(source: &str, options: NoShadowOptions) -> Vec<Diagnostic> {
        let analysis_options = AnalysisOptions {
            hoist: options.hoist,
            builtin_globals: options.builtin_globals,
            ..AnalysisOptions::default()
        };
        let analysis = analyze_ts(source, &analysis_options);
        let mut diagnostics = NoShadow::new(options).check(&analysis);
        diagnostics.sort();
        diagnostics
    }

    fn check(source: &str) -> Vec<Diagnostic> {
        check_with(source, NoShadowOptions::default())
    }

    #[test]
    fn test_shadowed_variable() {
        let diagnostics = check("var x = 1; function f() { var x = 2; }");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message_id, MessageId::NoShadow);
        assert_eq!(diagnostics[0].position(), Position::new(1, 31));
        assert_eq!(
            diagnostics[0].description,
            "'x' is already declared in the upper scope on line 1 column 5."
        );
    }

    #[test]
    fn test_same_scope_is_not_shadowing() {
        assert!(check("var a; var a;").is_empty());
        assert!(check("const a = 1; const b = 2;").is_empty());
    }

    #[test]
    fn test_nested_block_shadowing() {
        let diagnostics = check("let a = 1;\nif (a) {\n  let a = 2;\n}");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position(), Position::new(3, 7));
    }

    #[test]
    fn test_type_value_shadow_ignored_by_default() {
        let source = "type T = string;\nfunction f(T: number) {}";
        assert!(check(source).is_empty());

        let strict = NoShadowOptions {
            ignore_type_value_shadow: false,
            ..NoShadowOptions::default()
        };
        assert_eq!(check_with(source, strict).len(), 1);
    }

    #[test]
    fn test_function_type_parameter_names() {
        let source = "const test = 1;\ntype Func = (test: string) => typeof test;";
        assert!(check(source).is_empty());

        let strict = NoShadowOptions {
            ignore_function_type_parameter_name_value_shadow: false,
            ..NoShadowOptions::default()
        };
        let diagnostics = check_with(source, strict);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position(), Position::new(2, 14));
    }

    #[test]
    fn test_hoist_policy() {
        // a later `let` does not exist yet when the inner one is declared
        let later_let = "function f() { let a; }\nlet a;";
        assert!(check(later_let).is_empty());
        let all = NoShadowOptions {
            hoist: HoistPolicy::All,
            ..NoShadowOptions::default()
        };
        assert_eq!(check_with(later_let, all).len(), 1);

        // functions are hoisted by default
        let later_function = "function f() { let a; }\nfunction a() {}";
        assert_eq!(check(later_function).len(), 1);
        let never = NoShadowOptions {
            hoist: HoistPolicy::Never,
            ..NoShadowOptions::default()
        };
        assert!(check_with(later_function, never).is_empty());
    }

    #[test]
    fn test_builtin_globals() {
        let source = "function f() { var Object = 0; }";
        assert!(check(source).is_empty());

        let options = NoShadowOptions {
            builtin_globals: true,
            ..NoShadowOptions::default()
        };
        let diagnostics = check_with(source, options);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message_id, MessageId::NoShadowGlobal);
        assert_eq!(diagnostics[0].description, "'Object' is already a global variable.");
    }

    #[test]
    fn test_allow_list() {
        let source = "const done = 1;\nfunction f(done: () => void) {}";
        assert_eq!(check(source).len(), 1);
        let options = NoShadowOptions {
            allow: vec!["done".to_string()],
            ..NoShadowOptions::default()
        };
        assert!(check_with(source, options).is_empty());
    }

    #[test]
    fn test_global_augmentation_exempt() {
        let source = "export {};\ninterface Window { a: string }\ndeclare global {\n  interface Window { b: string }\n}";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_ignore_on_initialization() {
        let source = "const a = [1].map(a => a);";
        assert_eq!(check(source).len(), 1);
        let options = NoShadowOptions {
            ignore_on_initialization: true,
            ..NoShadowOptions::default()
        };
        assert!(check_with(source, options).is_empty());
    }

    #[test]
    fn test_self_bindings_and_members_never_shadow() {
        assert!(check("const C = class C {};").is_empty());
        assert!(check("const f = function f() {};").is_empty());
        assert!(check("const A = 1;\nenum E { A }").is_empty());
    }

    #[test]
    fn test_nearest_outer_declaration_is_named() {
        let source = "let v = 1;\nfunction f() {\n  let v = 2;\n  function g() {\n    let v = 3;\n  }\n}";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[1].position(), Position::new(5, 9));
        assert_eq!(
            diagnostics[1].description,
            "'v' is already declared in the upper scope on line 3 column 7."
        );
    }
}
