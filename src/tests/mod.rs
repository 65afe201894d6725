use crate::types::EngineConfig;
use std::collections::HashMap;

mod bulk;

pub(crate) fn config(keys: &[&str], windows: &[usize], capacity: usize) -> EngineConfig {
    EngineConfig::new(
        keys.iter().map(|k| k.to_string()).collect(),
        windows.to_vec(),
        capacity,
    )
}

pub(crate) fn batch(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}
