pub struct Icons;

impl Icons {
    pub const PIN: &str = "📌";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const DATABASE: &str = "🗄️";
    pub const FOLDER: &str = "📁";
    pub const TRASH: &str = "🗑️";
    pub const RESTORE: &str = "🔁";
    pub const EMPTY: &str = "∅";
}
