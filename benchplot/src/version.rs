pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `benchplot v<version>`, logged once at startup.
pub fn banner() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), VERSION)
}
