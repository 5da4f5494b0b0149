use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::ProjectError;
use crate::store::ProjectStore;

/// Number of encoded characters kept in the share hash.
pub const SHARE_HASH_LEN: usize = 20;

/// 產生分享用參考網址。 / Builds a mock share reference for the project.
///
/// The hash is the first [`SHARE_HASH_LEN`] characters of the base64-encoded
/// JSON of the file map; it identifies content, it does not carry it.
pub fn share_reference(
    base_url: &str,
    project_name: &str,
    store: &ProjectStore,
) -> Result<String, ProjectError> {
    let payload =
        serde_json::to_vec(store.files()).map_err(|err| ProjectError::Serialize(err.to_string()))?;
    let encoded = BASE64.encode(payload);
    let hash: String = encoded.chars().take(SHARE_HASH_LEN).collect();
    let base = base_url.trim_end_matches('/');
    Ok(format!("{base}/project/{project_name}?hash={hash}..."))
}
