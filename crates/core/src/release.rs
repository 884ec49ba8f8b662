//! Release and model artifact naming rules.
//!
//! Release packages are stored as `releases/tontext-v<version>.apk`, where
//! `<version>` is any non-empty string. Model files are stored as
//! `models/<filename>.bin` and carry no version semantics.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Key prefix under which release packages are stored.
pub const RELEASES_DIR: &str = "releases/";

/// Key prefix under which model files are stored.
pub const MODELS_DIR: &str = "models/";

/// File name prefix shared by every release package.
pub const RELEASE_NAME_PREFIX: &str = "tontext-v";

/// Listing prefix used by the version resolver.
pub const RELEASE_LIST_PREFIX: &str = "releases/tontext-v";

/// Extension of release packages.
pub const RELEASE_EXTENSION: &str = ".apk";

/// Extension of model files.
pub const MODEL_EXTENSION: &str = ".bin";

/// MIME type of Android release packages.
pub const APK_CONTENT_TYPE: &str = "application/vnd.android.package-archive";

/// MIME type used when streaming model files directly.
pub const MODEL_CONTENT_TYPE: &str = "application/octet-stream";

/// Captures the version token anywhere in a release name or key.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"tontext-v(.+)\.apk").expect("valid regex"));

/// Anchored at the start of an uploaded file name.
static UPLOAD_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tontext-v.+\.apk").expect("valid regex"));

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Extract the version token from a release file name or object key.
///
/// `releases/tontext-v1.2.0.apk` yields `Some("1.2.0")`. Returns `None`
/// when the name does not follow the `tontext-v<version>.apk` convention.
pub fn extract_version(name: &str) -> Option<&str> {
    VERSION_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Canonical download file name for a version.
pub fn release_filename(version: &str) -> String {
    format!("{RELEASE_NAME_PREFIX}{version}{RELEASE_EXTENSION}")
}

/// Object key for an uploaded release file name.
pub fn release_object_key(filename: &str) -> String {
    format!("{RELEASES_DIR}{filename}")
}

/// Object key for a model file, or `None` if the name is not a servable
/// `.bin` file name.
pub fn model_object_key(filename: &str) -> Option<String> {
    if !filename.ends_with(MODEL_EXTENSION) || has_path_separator(filename) {
        return None;
    }
    Some(format!("{MODELS_DIR}{filename}"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the file name of an uploaded release package.
///
/// The name must end with `.apk` and begin with `tontext-v` followed by a
/// non-empty version token. Path separators are rejected so the name can
/// be used verbatim as the last segment of an object key.
pub fn validate_release_filename(filename: Option<&str>) -> Result<&str, CoreError> {
    let filename = filename
        .filter(|f| f.ends_with(RELEASE_EXTENSION))
        .ok_or_else(|| CoreError::Validation("File must be an .apk".into()))?;

    if !UPLOAD_NAME_RE.is_match(filename) || has_path_separator(filename) {
        return Err(CoreError::Validation(
            "Filename must match tontext-v*.apk".into(),
        ));
    }

    Ok(filename)
}

/// Version reported back for an upload; falls back to the raw file name.
pub fn upload_version(filename: &str) -> &str {
    extract_version(filename).unwrap_or(filename)
}

fn has_path_separator(name: &str) -> bool {
    name.contains('/') || name.contains('\\')
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Pick the latest release key from a listing.
///
/// Keeps keys ending in `.apk` and returns the greatest one in plain
/// lexicographic order. This is a string comparison, not a semantic
/// version comparison: `tontext-v9.0.0.apk` sorts above
/// `tontext-v10.0.0.apk`.
pub fn pick_latest<I>(keys: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    keys.into_iter()
        .filter(|k| k.ends_with(RELEASE_EXTENSION))
        .max()
}
