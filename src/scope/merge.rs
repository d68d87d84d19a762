//! Declaration-merge matrix
//!
//! Same-scope declarations that share a namespace either merge into one
//! logical entity or conflict. The decision only depends on the incoming
//! declaration's merge class and on how many declarations of each class are
//! already present, so it is expressed as a table of rows keyed by the
//! incoming class.

use crate::symbol::DeclKind;

/// How a declaration kind takes part in merging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeClass {
    Interface,
    Class,
    /// Function implementation
    Function,
    /// Overload signature; always merges
    Overload,
    Enum,
    Namespace,
    /// Everything that never merges (variables, imports, parameters, ...)
    Other,
}

impl MergeClass {
    pub fn of(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Interface => MergeClass::Interface,
            DeclKind::ClassName => MergeClass::Class,
            DeclKind::FunctionName => MergeClass::Function,
            DeclKind::FunctionSignature => MergeClass::Overload,
            DeclKind::EnumName => MergeClass::Enum,
            DeclKind::TsModule => MergeClass::Namespace,
            _ => MergeClass::Other,
        }
    }
}

/// Per-class counts of the declarations already in a merge group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeCounts {
    pub interfaces: usize,
    pub classes: usize,
    pub functions: usize,
    pub enums: usize,
    pub namespaces: usize,
    pub others: usize,
}

impl MergeCounts {
    /// Count prior declarations by merge class. Overloads are not counted.
    pub fn tally(kinds: impl IntoIterator<Item = DeclKind>) -> Self {
        let mut counts = Self::default();
        for kind in kinds {
            match MergeClass::of(kind) {
                MergeClass::Interface => counts.interfaces += 1,
                MergeClass::Class => counts.classes += 1,
                MergeClass::Function => counts.functions += 1,
                MergeClass::Overload => {}
                MergeClass::Enum => counts.enums += 1,
                MergeClass::Namespace => counts.namespaces += 1,
                MergeClass::Other => counts.others += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.interfaces + self.classes + self.functions + self.enums + self.namespaces + self.others
    }

    /// Class, function and enum declarations; at most one may anchor a group
    fn anchors(&self) -> usize {
        self.classes + self.functions + self.enums
    }
}

struct MergeRule {
    incoming: MergeClass,
    conflicts: fn(&MergeCounts) -> bool,
}

fn interface_conflicts(prior: &MergeCounts) -> bool {
    prior.functions > 0 || prior.enums > 0 || prior.classes > 1
}

fn anchor_conflicts(prior: &MergeCounts) -> bool {
    prior.anchors() > 0
}

fn namespace_conflicts(prior: &MergeCounts) -> bool {
    prior.namespaces > 0 && prior.anchors() > 0
}

fn never(_: &MergeCounts) -> bool {
    false
}

const MERGE_RULES: &[MergeRule] = &[
    MergeRule { incoming: MergeClass::Interface, conflicts: interface_conflicts },
    MergeRule { incoming: MergeClass::Class, conflicts: anchor_conflicts },
    MergeRule { incoming: MergeClass::Function, conflicts: anchor_conflicts },
    MergeRule { incoming: MergeClass::Enum, conflicts: anchor_conflicts },
    MergeRule { incoming: MergeClass::Namespace, conflicts: namespace_conflicts },
    MergeRule { incoming: MergeClass::Overload, conflicts: never },
];

/// Whether `incoming` conflicts with the declarations counted in `prior`.
///
/// `prior` must only count same-scope, same-name declarations that share a
/// namespace with `incoming`. With `ignore_declaration_merge` off, every
/// collision conflicts except overload signatures.
pub fn conflicts(incoming: DeclKind, prior: &MergeCounts, ignore_declaration_merge: bool) -> bool {
    let class = MergeClass::of(incoming);
    if prior.total() == 0 || class == MergeClass::Overload {
        return false;
    }
    if !ignore_declaration_merge || prior.others > 0 {
        return true;
    }
    MERGE_RULES
        .iter()
        .find(|rule| rule.incoming == class)
        .map(|rule| (rule.conflicts)(prior))
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use DeclKind::*;

    fn check(incoming: DeclKind, prior: &[DeclKind]) -> bool {
        conflicts(incoming, &MergeCounts::tally(prior.iter().copied()), true)
    }

    #[test]
    fn test_interfaces_always_merge() {
        assert!(!check(Interface, &[Interface]));
        assert!(!check(Interface, &[Interface, Interface, Interface]));
    }

    #[test]
    fn test_interface_with_class_and_namespace() {
        assert!(!check(Interface, &[ClassName]));
        assert!(!check(ClassName, &[Interface]));
        assert!(!check(Interface, &[ClassName, TsModule]));
        assert!(!check(TsModule, &[Interface, ClassName]));
        assert!(check(Interface, &[ClassName, ClassName]));
        assert!(check(Interface, &[EnumName]));
    }

    #[test]
    fn test_namespace_merging() {
        assert!(!check(TsModule, &[TsModule]));
        assert!(!check(TsModule, &[FunctionName]));
        assert!(!check(TsModule, &[EnumName]));
        assert!(check(TsModule, &[ClassName, TsModule]));
        assert!(check(TsModule, &[TsModule, FunctionName]));
    }

    #[test]
    fn test_anchor_kinds_occur_once() {
        assert!(check(ClassName, &[ClassName]));
        assert!(check(FunctionName, &[FunctionName]));
        assert!(check(EnumName, &[EnumName]));
        assert!(check(EnumName, &[TsModule, EnumName]));
        assert!(check(FunctionName, &[ClassName]));
    }

    #[test]
    fn test_overloads_never_conflict() {
        assert!(!check(FunctionSignature, &[FunctionSignature]));
        assert!(!check(FunctionName, &[FunctionSignature, FunctionSignature]));
        assert!(!conflicts(
            FunctionName,
            &MergeCounts::tally([FunctionSignature]),
            false
        ));
    }

    #[test]
    fn test_non_mergeable_kinds() {
        assert!(check(Variable, &[Variable]));
        assert!(check(Variable, &[Interface]));
        assert!(check(Interface, &[TypeAlias]));
        assert!(check(ClassName, &[Import]));
        assert!(!check(Variable, &[]));
    }

    #[test]
    fn test_merge_disabled() {
        let prior = MergeCounts::tally([Interface]);
        assert!(conflicts(Interface, &prior, false));
        assert!(!conflicts(Interface, &prior, true));
    }
}
