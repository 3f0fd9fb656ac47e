//! Object key handling: the recursion guard and output key mapping.

use crate::encode::OutputFormat;

/// Canonical form of a processed prefix: trailing slashes collapsed to one.
pub fn normalize_prefix(processed_prefix: &str) -> String {
    format!("{}/", processed_prefix.trim_end_matches('/'))
}

/// True iff `key` lives under `processed_prefix`.
///
/// Output objects are written under the prefix, so a trigger for one of
/// them must not be processed again. The prefix is normalized the same way
/// [`map_key`] normalizes it.
pub fn is_already_processed(key: &str, processed_prefix: &str) -> bool {
    key.starts_with(&normalize_prefix(processed_prefix))
}

/// Map an input key to the key the transcoded output is written to.
///
/// The directory part is kept and the filename's extension is replaced with
/// the lowercase format name (or appended when there is none). A leading dot
/// does not start an extension, so `.hidden` gains one instead of losing its
/// name. The result is placed under `processed_prefix`, which is normalized
/// to end in exactly one `/`.
pub fn map_key(input_key: &str, processed_prefix: &str, format: OutputFormat) -> String {
    let (dir, file) = match input_key.rfind('/') {
        Some(idx) => input_key.split_at(idx + 1),
        None => ("", input_key),
    };

    let stem = match file.rfind('.') {
        Some(idx) if idx > 0 => &file[..idx],
        _ => file,
    };

    let prefix = normalize_prefix(processed_prefix);

    format!("{prefix}{dir}{stem}.{}", format.extension())
}
