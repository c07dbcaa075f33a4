//! Key/value configuration lookup by `[section] key`.

pub trait ConfigPort {
    /// Raw value, untrimmed. Parsing and defaults are the caller's concern.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
