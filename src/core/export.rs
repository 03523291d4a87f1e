//! Rendering a record as a portable `v1/Secret` document, and reading one back.

use crate::constants;
use crate::error::SecretError;
use crate::models::record::{CredentialRecord, Payload};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Toml,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Toml => f.write_str("toml"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretDocument {
    api_version: String,
    kind: String,
    metadata: DocumentMeta,
    #[serde(default)]
    string_data: Payload,
}

#[derive(Debug, Serialize, Deserialize)]
struct DocumentMeta {
    name: String,
    namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    labels: BTreeMap<String, String>,
}

/// Write `record` to `out` in the given format, followed by a newline.
pub fn export<W: Write>(
    record: &CredentialRecord,
    format: ExportFormat,
    out: &mut W,
) -> Result<(), SecretError> {
    let text = render(record, format)?;
    out.write_all(text.as_bytes()).map_err(SecretError::Write)?;
    if !text.ends_with('\n') {
        out.write_all(b"\n").map_err(SecretError::Write)?;
    }
    out.flush().map_err(SecretError::Write)
}

fn render(record: &CredentialRecord, format: ExportFormat) -> Result<String, SecretError> {
    let doc = SecretDocument {
        api_version: constants::EXPORT_API_VERSION.to_string(),
        kind: constants::EXPORT_KIND.to_string(),
        metadata: DocumentMeta {
            name: record.name().to_string(),
            namespace: record.namespace().to_string(),
            labels: record.labels().clone(),
        },
        string_data: record.payload().clone(),
    };
    let rendered = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&doc).map_err(std::io::Error::other),
        ExportFormat::Toml => toml::to_string_pretty(&doc).map_err(std::io::Error::other),
    };
    rendered.map_err(SecretError::Write)
}

/// Parse an exported document back into a record.
pub fn parse_document(text: &str, format: ExportFormat) -> Result<CredentialRecord, SecretError> {
    let parse_err = |reason: String| SecretError::Parse { format, reason };
    let doc: SecretDocument = match format {
        ExportFormat::Json => serde_json::from_str(text).map_err(|e| parse_err(e.to_string()))?,
        ExportFormat::Toml => toml::from_str(text).map_err(|e| parse_err(e.to_string()))?,
    };
    if doc.api_version != constants::EXPORT_API_VERSION {
        return Err(parse_err(format!(
            "expected apiVersion '{}', found '{}'",
            constants::EXPORT_API_VERSION,
            doc.api_version
        )));
    }
    if doc.kind != constants::EXPORT_KIND {
        return Err(parse_err(format!(
            "expected kind '{}', found '{}'",
            constants::EXPORT_KIND,
            doc.kind
        )));
    }
    CredentialRecord::new(
        doc.metadata.name,
        doc.metadata.namespace,
        doc.metadata.labels,
        doc.string_data,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::{assemble_with, CredentialSources};
    use std::io;
    use std::path::Path;

    fn sample() -> CredentialRecord {
        let sources = CredentialSources {
            username: Some("bot".into()),
            password: Some("p@ss=word".into()),
            cert_file: Some("tls.crt".into()),
            key_file: Some("tls.key".into()),
            ca_file: Some("ca.crt".into()),
        };
        let mut labels = BTreeMap::new();
        labels.insert("app".into(), "podinfo".into());
        assemble_with("repo-auth", "apps", labels, &sources, |p: &Path| {
            Ok(format!("-----BEGIN {}-----\nAAAA\n-----END-----\n", p.display()))
        })
        .unwrap()
    }

    fn export_to_string(record: &CredentialRecord, format: ExportFormat) -> String {
        let mut buf = Vec::new();
        export(record, format, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_json_shape() {
        let text = export_to_string(&sample(), ExportFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["apiVersion"], "v1");
        assert_eq!(value["kind"], "Secret");
        assert_eq!(value["metadata"]["name"], "repo-auth");
        assert_eq!(value["metadata"]["namespace"], "apps");
        assert_eq!(value["metadata"]["labels"]["app"], "podinfo");
        assert_eq!(value["stringData"]["username"], "bot");
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_round_trip_json() {
        let record = sample();
        let text = export_to_string(&record, ExportFormat::Json);
        assert_eq!(parse_document(&text, ExportFormat::Json).unwrap(), record);
    }

    #[test]
    fn test_round_trip_toml() {
        let record = sample();
        let text = export_to_string(&record, ExportFormat::Toml);
        assert_eq!(parse_document(&text, ExportFormat::Toml).unwrap(), record);
    }

    #[test]
    fn test_export_is_deterministic() {
        let record = sample();
        assert_eq!(
            export_to_string(&record, ExportFormat::Json),
            export_to_string(&record, ExportFormat::Json)
        );
    }

    #[test]
    fn test_empty_labels_omitted() {
        let record = assemble_with(
            "x",
            "ns",
            BTreeMap::new(),
            &CredentialSources::default(),
            |_: &Path| unreachable!(),
        )
        .unwrap();
        let text = export_to_string(&record, ExportFormat::Json);
        assert!(!text.contains("labels"));
        assert_eq!(parse_document(&text, ExportFormat::Json).unwrap(), record);
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_write_error() {
        let err = export(&sample(), ExportFormat::Json, &mut BrokenSink).unwrap_err();
        assert!(matches!(err, SecretError::Write(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }

    #[test]
    fn test_parse_rejects_wrong_kind() {
        let text = r#"{"apiVersion":"v1","kind":"ConfigMap","metadata":{"name":"a","namespace":"b"}}"#;
        let err = parse_document(text, ExportFormat::Json).unwrap_err();
        assert!(matches!(err, SecretError::Parse { format: ExportFormat::Json, .. }));
    }

    #[test]
    fn test_parse_rejects_wrong_api_version() {
        let text = r#"{"apiVersion":"v2","kind":"Secret","metadata":{"name":"a","namespace":"b"}}"#;
        let err = parse_document(text, ExportFormat::Json).unwrap_err();
        assert!(matches!(err, SecretError::Parse { format: ExportFormat::Json, .. }));
        assert!(err.to_string().contains("apiVersion"));
    }

    #[test]
    fn test_parse_rejects_empty_identity() {
        let text = r#"{"apiVersion":"v1","kind":"Secret","metadata":{"name":"a","namespace":""}}"#;
        let err = parse_document(text, ExportFormat::Json).unwrap_err();
        assert!(matches!(err, SecretError::InvalidName { field: "namespace", .. }));

        let text = "apiVersion = \"v1\"\nkind = \"Secret\"\n\n[metadata]\nname = \"\"\nnamespace = \"ns\"\n";
        let err = parse_document(text, ExportFormat::Toml).unwrap_err();
        assert!(matches!(err, SecretError::InvalidName { field: "name", .. }));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_document("not = [toml", ExportFormat::Toml),
            Err(SecretError::Parse { .. })
        ));
    }
}
