use figment::providers::{Format, Json, Toml, Yaml};
use std::path::Path;

/// Pick the figment provider for a defaults file from its extension.
/// Unknown extensions are sniffed from the content, falling back to TOML.
pub fn auto<P: AsRef<Path>>(path: P) -> impl figment::Provider {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = match extension.as_str() {
        "toml" => Some(FileFormat::Toml),
        "json" => Some(FileFormat::Json),
        "yaml" | "yml" => Some(FileFormat::Yaml),
        _ => std::fs::read_to_string(path)
            .ok()
            .and_then(|content| detect_format_from_content(&content)),
    };

    match format.unwrap_or_else(|| {
        tracing::debug!("could not detect format of {}, assuming TOML", path.display());
        FileFormat::Toml
    }) {
        FileFormat::Toml => SmartProvider::Toml(Toml::file(path)),
        FileFormat::Json => SmartProvider::Json(Json::file(path)),
        FileFormat::Yaml => SmartProvider::Yaml(Yaml::file(path)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Toml,
    Json,
    Yaml,
}

/// Wrapper enum to handle different provider types
enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
    Yaml(figment::providers::Data<Yaml>),
}

impl figment::Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

/// Attempt to detect configuration format from file content
fn detect_format_from_content(content: &str) -> Option<FileFormat> {
    let trimmed = content.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(FileFormat::Json);
    }

    // `key = value` lines; checked before YAML since TOML strings may contain colons
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']'))
            || line.split_once('=').is_some_and(|(key, _)| !key.contains(':'))
    }) {
        return Some(FileFormat::Toml);
    }

    if trimmed.starts_with("---")
        || trimmed
            .lines()
            .any(|line| line.contains(": ") || line.trim_end().ends_with(':'))
    {
        return Some(FileFormat::Yaml);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            detect_format_from_content(r#"{"isort_force": true}"#),
            Some(FileFormat::Json)
        );
        assert_eq!(
            detect_format_from_content("isort_force: true"),
            Some(FileFormat::Yaml)
        );
        assert_eq!(
            detect_format_from_content("isort_force = true"),
            Some(FileFormat::Toml)
        );
        assert_eq!(
            detect_format_from_content("eslint_path = \"C:/tools/eslint\""),
            Some(FileFormat::Toml)
        );
        assert_eq!(detect_format_from_content("just words"), None);
    }
}
