use crate::errors::ApiError;
use mdimg_models::LinkType;

/// A parameter that must be present and non-blank
pub(super) fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::Validation(format!("{} is required", name))),
    }
}

/// Missing or blank means `local`
pub(super) fn link_type(value: Option<String>) -> Result<LinkType, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => value.parse().map_err(ApiError::Validation),
        _ => Ok(LinkType::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_count_as_missing() {
        assert!(required(None, "directory").is_err());
        assert!(required(Some("  ".to_string()), "directory").is_err());
        assert_eq!(required(Some("/notes".to_string()), "directory").unwrap(), "/notes");
    }

    #[test]
    fn test_link_type_defaults_to_local() {
        assert_eq!(link_type(None).unwrap(), LinkType::Local);
        assert_eq!(link_type(Some(String::new())).unwrap(), LinkType::Local);
        assert_eq!(link_type(Some("remote".to_string())).unwrap(), LinkType::Remote);
        assert!(matches!(link_type(Some("ftp".to_string())), Err(ApiError::Validation(_))));
    }
}
