//! Push options supplied by the git server to the hook environment.

use std::collections::HashMap;
use std::env;

/// Push option that suppresses all CI dispatch (`git push -o ci.skip`).
pub const SKIP_OPTION: &str = "ci.skip";

const COUNT_VAR: &str = "GIT_PUSH_OPTION_COUNT";

/// Key/value annotations attached to the push, exposed by the git server as a
/// count-prefixed series of `GIT_PUSH_OPTION_<n>` environment variables.
/// Built once per invocation, read-only afterwards.
#[derive(Debug, Default)]
pub struct PushOptions {
    options: HashMap<String, String>,
}

impl PushOptions {
    /// Reads `GIT_PUSH_OPTION_COUNT` and the corresponding numbered entries.
    /// An absent or unparsable count means no options were sent.
    pub fn from_env() -> Self {
        let count = env::var(COUNT_VAR)
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);
        let entries = (0..count).filter_map(|i| env::var(format!("GIT_PUSH_OPTION_{i}")).ok());
        Self::from_entries(entries)
    }

    /// Builds the mapping from raw `key[=value]` entries. An entry with no `=`
    /// yields an empty value; duplicate keys keep the last value seen.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = HashMap::new();
        for entry in entries {
            match entry.split_once('=') {
                Some((k, v)) => options.insert(k.to_string(), v.to_string()),
                None => options.insert(entry, String::new()),
            };
        }
        Self { options }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Returns true if the pusher opted out of CI for this push.
    pub fn skip_requested(&self) -> bool {
        self.contains(SKIP_OPTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(entries: &[&str]) -> PushOptions {
        PushOptions::from_entries(entries.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_key_value_entries() {
        let options = opts(&["ci.pipeline=deploy", "notify=off"]);
        assert_eq!(options.get("ci.pipeline"), Some("deploy"));
        assert_eq!(options.get("notify"), Some("off"));
    }

    #[test]
    fn entry_without_equals_yields_empty_value() {
        let options = opts(&["ci.skip"]);
        assert!(options.contains("ci.skip"));
        assert_eq!(options.get("ci.skip"), Some(""));
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let options = opts(&["env=staging", "env=prod"]);
        assert_eq!(options.get("env"), Some("prod"));
    }

    #[test]
    fn value_may_contain_equals() {
        let options = opts(&["note=a=b"]);
        assert_eq!(options.get("note"), Some("a=b"));
    }

    #[test]
    fn skip_requested_only_with_skip_key() {
        assert!(opts(&["ci.skip"]).skip_requested());
        assert!(opts(&["ci.skip=1"]).skip_requested());
        assert!(!opts(&["ci.skipped"]).skip_requested());
        assert!(!opts(&[]).skip_requested());
    }
}
