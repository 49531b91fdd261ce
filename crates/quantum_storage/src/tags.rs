#![forbid(unsafe_code)]

//! Bounded tag-collection merge rules shared by the record mutation paths.

use quantum_kernel_contracts::qrec::{
    is_valid_tag_collection, RegistryError, MAX_TAGS, PRESERVATION_TAG,
};

/// `current` followed by one `PRESERVED` marker. Existing tags are not re-validated.
pub fn with_preservation_marker(current: &[String]) -> Result<Vec<String>, RegistryError> {
    if current.len() + 1 > MAX_TAGS {
        return Err(RegistryError::TagValidationFailed);
    }
    let mut merged = Vec::with_capacity(current.len() + 1);
    merged.extend_from_slice(current);
    merged.push(PRESERVATION_TAG.to_string());
    Ok(merged)
}

/// `current` followed by `additional`, in order. `additional` must itself be a valid collection.
pub fn merged_with(
    current: &[String],
    additional: &[String],
) -> Result<Vec<String>, RegistryError> {
    if !is_valid_tag_collection(additional) {
        return Err(RegistryError::TagValidationFailed);
    }
    if current.len() + additional.len() > MAX_TAGS {
        return Err(RegistryError::TagValidationFailed);
    }
    let mut merged = Vec::with_capacity(current.len() + additional.len());
    merged.extend_from_slice(current);
    merged.extend_from_slice(additional);
    Ok(merged)
}
