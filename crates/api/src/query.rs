//! Query parameter types shared by handlers.

use serde::Deserialize;

/// `?expand=characters.costumes,scenes`: comma-separated expansion paths.
#[derive(Debug, Default, Deserialize)]
pub struct ExpandParams {
    pub expand: Option<String>,
}

impl ExpandParams {
    pub fn paths(&self) -> Vec<String> {
        self.expand
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// `?q=` for scene search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_splits_on_commas() {
        let params = ExpandParams {
            expand: Some("characters.costumes, scenes,".into()),
        };
        assert_eq!(params.paths(), vec!["characters.costumes", "scenes"]);
        assert!(ExpandParams::default().paths().is_empty());
    }
}
