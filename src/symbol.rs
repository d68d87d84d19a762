//! Declaration types
//!
//! Every binding the engine knows about is a `Declaration`. A declaration
//! occupies one or both of the two namespaces:
//! - `Type`: names usable in type positions (interfaces, type aliases, ...)
//! - `Value`: names usable at runtime (variables, functions, parameters, ...)
//!
//! Classes, enums, namespaces and imports occupy both.

use crate::position::{Position, Span};
use crate::scope::ScopeId;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The type-space / value-space partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Type,
    Value,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Type => "type",
            Namespace::Value => "value",
        }
    }

    pub fn all() -> &'static [Namespace] {
        &[Namespace::Type, Namespace::Value]
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The set of namespaces a declaration occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Namespaces {
    ty: bool,
    value: bool,
}

impl Namespaces {
    pub const TYPE: Namespaces = Namespaces { ty: true, value: false };
    pub const VALUE: Namespaces = Namespaces { ty: false, value: true };
    pub const BOTH: Namespaces = Namespaces { ty: true, value: true };

    pub fn contains(self, namespace: Namespace) -> bool {
        match namespace {
            Namespace::Type => self.ty,
            Namespace::Value => self.value,
        }
    }

    /// Whether the two sets share at least one namespace
    pub fn intersects(self, other: Namespaces) -> bool {
        (self.ty && other.ty) || (self.value && other.value)
    }

    pub fn is_value(self) -> bool {
        self.value
    }

    pub fn iter(self) -> impl Iterator<Item = Namespace> {
        Namespace::all()
            .iter()
            .copied()
            .filter(move |ns| self.contains(*ns))
    }
}

impl Serialize for Namespaces {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

/// Closed set of declaration kinds.
///
/// The kind decides which namespaces a declaration occupies, how it merges
/// with same-named declarations, and whether it can be hoisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    /// `var`, `let`, `const` (one per bound identifier)
    Variable,
    /// Function implementation name
    FunctionName,
    /// Overload signature or ambient `declare function`
    FunctionSignature,
    ClassName,
    EnumName,
    Interface,
    TypeAlias,
    /// `namespace X {}` / `module X {}`
    TsModule,
    Parameter,
    CatchParam,
    Import,
    TypeParameter,
    EnumMember,
    /// Pre-registered global such as `Object` or `window`
    Builtin,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Variable => "variable",
            DeclKind::FunctionName => "function",
            DeclKind::FunctionSignature => "function-signature",
            DeclKind::ClassName => "class",
            DeclKind::EnumName => "enum",
            DeclKind::Interface => "interface",
            DeclKind::TypeAlias => "type-alias",
            DeclKind::TsModule => "namespace",
            DeclKind::Parameter => "parameter",
            DeclKind::CatchParam => "catch-param",
            DeclKind::Import => "import",
            DeclKind::TypeParameter => "type-parameter",
            DeclKind::EnumMember => "enum-member",
            DeclKind::Builtin => "builtin",
        }
    }

    /// Namespaces occupied by default (imports narrow to `Type` for `import type`)
    pub fn default_namespaces(&self) -> Namespaces {
        match self {
            DeclKind::ClassName | DeclKind::EnumName | DeclKind::TsModule | DeclKind::Import => {
                Namespaces::BOTH
            }
            DeclKind::Interface | DeclKind::TypeAlias | DeclKind::TypeParameter => Namespaces::TYPE,
            _ => Namespaces::VALUE,
        }
    }

    /// Kinds that can be reported as same-scope redeclarations
    pub fn is_redeclarable(&self) -> bool {
        !matches!(self, DeclKind::TypeParameter | DeclKind::EnumMember)
    }

    /// Kinds that can shadow an outer declaration
    pub fn can_shadow(&self) -> bool {
        !matches!(
            self,
            DeclKind::TypeParameter | DeclKind::EnumMember | DeclKind::Builtin
        )
    }

    pub fn is_function(&self) -> bool {
        matches!(self, DeclKind::FunctionName | DeclKind::FunctionSignature)
    }

    /// Pure type declarations
    pub fn is_typedef(&self) -> bool {
        matches!(self, DeclKind::Interface | DeclKind::TypeAlias)
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which declaration kinds are visible before their textual position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoistPolicy {
    Never,
    Functions,
    Types,
    #[default]
    FunctionsAndTypes,
    All,
}

impl HoistPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoistPolicy::Never => "never",
            HoistPolicy::Functions => "functions",
            HoistPolicy::Types => "types",
            HoistPolicy::FunctionsAndTypes => "functions-and-types",
            HoistPolicy::All => "all",
        }
    }

    pub fn all() -> &'static [HoistPolicy] {
        &[
            HoistPolicy::Never,
            HoistPolicy::Functions,
            HoistPolicy::Types,
            HoistPolicy::FunctionsAndTypes,
            HoistPolicy::All,
        ]
    }

    /// Parse a policy name, falling back to `Never` for anything unknown
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown hoist policy {:?}, using \"never\"", value);
            HoistPolicy::Never
        })
    }

    pub fn hoists(&self, kind: DeclKind) -> bool {
        match self {
            HoistPolicy::Never => false,
            HoistPolicy::Functions => kind.is_function(),
            HoistPolicy::Types => kind.is_typedef(),
            HoistPolicy::FunctionsAndTypes => kind.is_function() || kind.is_typedef(),
            HoistPolicy::All => true,
        }
    }
}

impl FromStr for HoistPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "never" => Ok(HoistPolicy::Never),
            "functions" => Ok(HoistPolicy::Functions),
            "types" => Ok(HoistPolicy::Types),
            "functions-and-types" => Ok(HoistPolicy::FunctionsAndTypes),
            "all" => Ok(HoistPolicy::All),
            _ => Err(Error::InvalidOption(format!("Unknown hoist policy: {}", s))),
        }
    }
}

impl std::fmt::Display for HoistPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for HoistPolicy {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HoistPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(HoistPolicy::parse_lenient(&value))
    }
}

/// Index of a declaration in the symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DeclId(pub u32);

/// Where a declaration appears in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Site {
    /// Byte range of the name token
    pub span: Span,
    /// Start of the name token
    pub position: Position,
    /// Byte range of the whole declaring construct
    pub extent: Span,
}

/// A single named binding.
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    /// Assigned by the symbol table on insertion
    pub id: DeclId,
    pub name: String,
    pub namespaces: Namespaces,
    pub kind: DeclKind,
    pub scope: ScopeId,
    /// `None` for built-ins
    pub site: Option<Site>,
    /// Initializer of a variable, or the iterated expression of a `for-in/of` header
    pub init_range: Option<Span>,
    /// Default values of the destructuring elements enclosing the name
    pub default_ranges: Vec<Span>,
    pub hoistable: bool,
    /// Class-expression or function-expression name bound inside its own scope
    pub self_binding: bool,
    /// First same-named declaration this one legally merged with
    pub merge_group: Option<DeclId>,
}

impl Declaration {
    /// Create a declaration with the kind's default namespaces
    pub fn new(name: impl Into<String>, kind: DeclKind, scope: ScopeId, site: Option<Site>) -> Self {
        Self {
            id: DeclId(0),
            name: name.into(),
            namespaces: kind.default_namespaces(),
            kind,
            scope,
            site,
            init_range: None,
            default_ranges: Vec::new(),
            hoistable: false,
            self_binding: false,
            merge_group: None,
        }
    }

    /// Create a pre-registered global
    pub fn builtin(name: impl Into<String>, root: ScopeId) -> Self {
        Self::new(name, DeclKind::Builtin, root, None)
    }

    pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn with_init_range(mut self, range: Option<Span>) -> Self {
        self.init_range = range;
        self
    }

    pub fn with_default_ranges(mut self, ranges: Vec<Span>) -> Self {
        self.default_ranges = ranges;
        self
    }

    /// Whether `span` lies in the initializer or in an enclosing default value
    pub fn initializes_at(&self, span: Span) -> bool {
        self.init_range.is_some_and(|init| init.contains(span))
            || self.default_ranges.iter().any(|range| range.contains(span))
    }

    pub fn with_self_binding(mut self) -> Self {
        self.self_binding = true;
        self
    }

    pub fn is_builtin(&self) -> bool {
        self.kind == DeclKind::Builtin
    }

    pub fn position(&self) -> Option<Position> {
        self.site.map(|s| s.position)
    }

    pub fn span(&self) -> Option<Span> {
        self.site.map(|s| s.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_occupancy() {
        assert_eq!(DeclKind::ClassName.default_namespaces(), Namespaces::BOTH);
        assert_eq!(DeclKind::Interface.default_namespaces(), Namespaces::TYPE);
        assert_eq!(DeclKind::Variable.default_namespaces(), Namespaces::VALUE);
        assert!(Namespaces::BOTH.intersects(Namespaces::TYPE));
        assert!(!Namespaces::TYPE.intersects(Namespaces::VALUE));
        assert_eq!(Namespaces::BOTH.iter().collect::<Vec<_>>(), vec![Namespace::Type, Namespace::Value]);
    }

    #[test]
    fn test_hoist_policy_roundtrip() {
        for policy in HoistPolicy::all() {
            let parsed: HoistPolicy = policy.as_str().parse().unwrap();
            assert_eq!(*policy, parsed);
        }
        assert!(HoistPolicy::from_str("sometimes").is_err());
    }

    #[test]
    fn test_unknown_hoist_policy_is_never() {
        assert_eq!(HoistPolicy::parse_lenient("everything"), HoistPolicy::Never);
        assert_eq!(HoistPolicy::parse_lenient("all"), HoistPolicy::All);
    }

    #[test]
    fn test_hoisted_kinds() {
        let policy = HoistPolicy::FunctionsAndTypes;
        assert!(policy.hoists(DeclKind::FunctionName));
        assert!(policy.hoists(DeclKind::Interface));
        assert!(!policy.hoists(DeclKind::Variable));
        assert!(!HoistPolicy::Types.hoists(DeclKind::FunctionName));
        assert!(HoistPolicy::All.hoists(DeclKind::CatchParam));
        assert!(!HoistPolicy::Never.hoists(DeclKind::FunctionName));
    }

    #[test]
    fn test_builtin_declaration() {
        let decl = Declaration::builtin("Object", ScopeId::root());
        assert!(decl.is_builtin());
        assert!(decl.position().is_none());
        assert!(decl.namespaces.is_value());
    }
}
