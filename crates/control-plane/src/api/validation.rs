// Input validation for snippet APIs
//
// Turns raw request DTOs into normalized storage inputs. Limits are hard
// limits, not configurable.

use super::common::{ApiError, ErrorResponse};
use axum::http::StatusCode;
use serde_json::Value;
use snippets_core::{normalize_name, NewSnippet, SnippetPatch, DEFAULT_LANGUAGE};

use super::snippets::{CreateSnippetRequest, UpdateSnippetRequest};

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum snippet code length, in characters.
pub const MAX_SNIPPET_SIZE: usize = 50_000;

/// Maximum title length, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum tag and language name length, in characters.
pub const MAX_NAME_LENGTH: usize = 50;

// =============================================================================
// Validation Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Request body must be JSON")]
    NotJson,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Title is required")]
    TitleRequired,
    #[error("Title exceeds maximum length of {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,
    #[error("Code is required")]
    CodeRequired,
    #[error("Code exceeds maximum size of {MAX_SNIPPET_SIZE} characters")]
    CodeTooLarge,
    #[error("Language exceeds maximum length of {MAX_NAME_LENGTH} characters")]
    LanguageTooLong,
    #[error("Tag exceeds maximum length of {MAX_NAME_LENGTH} characters")]
    TagTooLong,
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ErrorResponse::new(e.to_string()).into_response(StatusCode::BAD_REQUEST)
    }
}

// =============================================================================
// Body Parsing
// =============================================================================

/// Parse a request body that must be a non-empty JSON object.
pub fn parse_json_object(body: &[u8]) -> Result<Value, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(Value::Object(map)),
        _ => Err(ValidationError::NotJson),
    }
}

/// Deserialize a JSON object into a request DTO.
pub fn from_object<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ValidationError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting request body");
        ValidationError::InvalidBody
    })
}

// =============================================================================
// Field Normalization
// =============================================================================

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

fn validate_code(code: String) -> Result<String, ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::CodeRequired);
    }
    if code.chars().count() > MAX_SNIPPET_SIZE {
        return Err(ValidationError::CodeTooLarge);
    }
    Ok(code)
}

fn validate_language(language: &str) -> Result<String, ValidationError> {
    let language = normalize_name(language);
    if language.is_empty() {
        return Ok(DEFAULT_LANGUAGE.to_string());
    }
    if language.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::LanguageTooLong);
    }
    Ok(language)
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Keep string entries only, normalized and de-duplicated in first-seen order.
pub fn normalize_tags(raw: Vec<Value>) -> Result<Vec<String>, ValidationError> {
    let mut tags: Vec<String> = Vec::new();
    for value in raw {
        let Value::String(name) = value else {
            continue;
        };
        let name = normalize_name(&name);
        if name.is_empty() || tags.contains(&name) {
            continue;
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::TagTooLong);
        }
        tags.push(name);
    }
    Ok(tags)
}

// =============================================================================
// Request Validation
// =============================================================================

pub fn validate_create(req: CreateSnippetRequest) -> Result<NewSnippet, ValidationError> {
    let title = validate_title(req.title.as_deref().unwrap_or_default())?;
    let code = validate_code(req.code.unwrap_or_default())?;
    let language = match req.language {
        Some(language) => validate_language(&language)?,
        None => DEFAULT_LANGUAGE.to_string(),
    };
    let tags = normalize_tags(req.tags.unwrap_or_default())?;

    Ok(NewSnippet {
        title,
        code,
        language,
        description: normalize_description(req.description),
        tags,
    })
}

pub fn validate_update(req: UpdateSnippetRequest) -> Result<SnippetPatch, ValidationError> {
    Ok(SnippetPatch {
        title: req.title.as_deref().map(validate_title).transpose()?,
        code: req.code.map(validate_code).transpose()?,
        language: req.language.as_deref().map(validate_language).transpose()?,
        description: req.description.map(normalize_description),
        tags: req.tags.map(normalize_tags).transpose()?,
    })
}
