pub struct Icons;

impl Icons {
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const FILE: &str = "📄";
    pub const TREE: &str = "🌳";
}
