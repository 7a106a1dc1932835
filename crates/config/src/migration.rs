use super::errors::ConfigError;
use std::path::Path;
use std::sync::Arc;
use toml_edit::{Array, DocumentMut, Item, Table, Value};

/// Migrates config file to latest format if needed
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    events: Option<&Arc<mdimg_events::EventBus>>,
) -> Result<(), ConfigError> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::unreadable(path, e))?;
    let mut doc = content.parse::<DocumentMut>().map_err(|source| ConfigError::Unparsable {
        path: path.display().to_string(),
        source,
    })?;
    let mut added_fields = Vec::new();

    migrate_document(&mut doc, &mut added_fields)?;

    if !added_fields.is_empty() {
        tokio::fs::write(path, doc.to_string())
            .await
            .map_err(|e| ConfigError::unreadable(path, e))?;
        tracing::debug!("Config migrated: {:?}", added_fields);

        if let Some(event_bus) = events {
            event_bus.emit(mdimg_events::AppEvent::ConfigMigrated {
                added_fields: added_fields.clone(),
            });
        }
    }

    Ok(())
}

fn migrate_document(doc: &mut DocumentMut, added_fields: &mut Vec<String>) -> Result<(), ConfigError> {
    migrate_server_section(doc, added_fields)?;
    migrate_mapping_section(doc, added_fields)?;
    migrate_upload_section(doc, added_fields)?;
    migrate_scan_section(doc, added_fields)?;
    migrate_download_section(doc, added_fields)?;
    Ok(())
}

fn migrate_server_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let server = ensure_section(doc, "server", added_fields)?;
    ensure_field(server, "host", Value::from("127.0.0.1"), added_fields);
    ensure_field(server, "port", Value::from(3000), added_fields);
    ensure_field(server, "timeout_secs", Value::from(600), added_fields);
    ensure_field(server, "max_body_size_mb", Value::from(1), added_fields);
    ensure_field(server, "max_concurrent_requests", Value::from(64), added_fields);
    ensure_field(server, "enable_compression", Value::from(true), added_fields);
    ensure_field(server, "allowed_origins", string_array(&["*"]), added_fields);
    Ok(())
}

fn migrate_mapping_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let mapping = ensure_section(doc, "mapping", added_fields)?;
    ensure_field(mapping, "file", Value::from("image-mapping.json"), added_fields);
    Ok(())
}

fn migrate_upload_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let upload = ensure_section(doc, "upload", added_fields)?;
    ensure_field(upload, "tool", Value::from("piclist"), added_fields);
    ensure_field(upload, "command", Value::from("upload"), added_fields);
    ensure_field(upload, "timeout_secs", Value::from(30), added_fields);
    Ok(())
}

fn migrate_scan_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let scan = ensure_section(doc, "scan", added_fields)?;
    ensure_field(scan, "document_extensions", string_array(&["md"]), added_fields);
    ensure_field(
        scan,
        "image_extensions",
        string_array(&["png", "jpg", "jpeg", "gif", "bmp", "webp", "svg"]),
        added_fields,
    );
    ensure_field(scan, "follow_links", Value::from(false), added_fields);
    Ok(())
}

fn migrate_download_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> Result<(), ConfigError> {
    let download = ensure_section(doc, "download", added_fields)?;
    ensure_field(download, "images_dir", Value::from("images"), added_fields);
    ensure_field(download, "timeout_secs", Value::from(30), added_fields);
    ensure_field(download, "user_agent", Value::from("mdimg"), added_fields);
    Ok(())
}

fn ensure_section<'a>(
    doc: &'a mut DocumentMut,
    name: &str,
    added_fields: &mut Vec<String>,
) -> Result<&'a mut Table, ConfigError> {
    if !doc.contains_key(name) {
        let mut table = Table::new();
        table.set_implicit(true);
        doc[name] = Item::Table(table);
        added_fields.push(name.to_string());
    }

    doc[name]
        .as_table_mut()
        .ok_or_else(|| ConfigError::bad_setting(name, "must be a [table]"))
}

fn ensure_field(
    table: &mut Table,
    key: &str,
    default_value: Value,
    added_fields: &mut Vec<String>,
) {
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        added_fields.push(key.to_string());
    }
}

fn string_array(values: &[&str]) -> Value {
    let mut arr = Array::new();
    for value in values {
        arr.push(*value);
    }
    Value::Array(arr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_missing_sections_and_keeps_values() {
        let mut doc = "[server]\nhost = \"0.0.0.0\"\nport = 8080\n"
            .parse::<DocumentMut>()
            .unwrap();
        let mut added = Vec::new();

        migrate_document(&mut doc, &mut added).unwrap();

        assert_eq!(doc["server"]["host"].as_str(), Some("0.0.0.0"));
        assert_eq!(doc["server"]["port"].as_integer(), Some(8080));
        assert_eq!(doc["upload"]["tool"].as_str(), Some("piclist"));
        assert_eq!(doc["mapping"]["file"].as_str(), Some("image-mapping.json"));
        assert!(added.contains(&"upload".to_string()));
        assert!(added.contains(&"timeout_secs".to_string()));
        assert!(!added.contains(&"host".to_string()));
    }

    #[test]
    fn test_complete_document_is_untouched() {
        let mut doc = crate::defaults::DEFAULT_CONFIG_TEMPLATE
            .parse::<DocumentMut>()
            .unwrap();
        let mut added = Vec::new();

        migrate_document(&mut doc, &mut added).unwrap();

        assert!(added.is_empty(), "unexpected additions: {:?}", added);
    }

    #[test]
    fn test_rejects_non_table_section() {
        let mut doc = "upload = 3\n[server]\nhost = \"h\"\nport = 1\n"
            .parse::<DocumentMut>()
            .unwrap();
        let mut added = Vec::new();

        let err = migrate_document(&mut doc, &mut added).unwrap_err();
        assert_eq!(err.to_string(), "Setting upload must be a [table]");
    }
}
