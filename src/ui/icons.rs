pub struct Icons;

impl Icons {
    pub const ROCKET: &str = "🚀";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const COMPANY: &str = "🏢";
    pub const INVESTOR: &str = "🏦";
    pub const NEWS: &str = "📰";
    pub const DATABASE: &str = "🗄️";
    pub const PLUG: &str = "🔌";
    pub const SUN: &str = "☀️";
    pub const MOON: &str = "🌙";
    pub const STAR: &str = "⭐";
}
