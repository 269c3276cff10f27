use serde::de::DeserializeOwned;

use crate::error::SchemaLoadError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SchemaLoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_load_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SchemaLoadError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_load_error)
}

fn into_load_error(err: serde_path_to_error::Error<serde_json::Error>) -> SchemaLoadError {
    let path = err.path().to_string();
    SchemaLoadError { path, source: err.into_inner() }
}
