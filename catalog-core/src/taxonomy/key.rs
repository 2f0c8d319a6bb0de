//! Key normalization
//!
//! Every create and rename path goes through [`normalize_key`], so a key typed
//! as `" Sample Prep "` and one typed as `"sample-prep"` always collide.

/// Normalize a raw category / subcategory key.
///
/// Trims, lowercases, folds accented Latin letters to ASCII (`ä` -> `a`,
/// `ß` -> `ss`), collapses every run of remaining characters outside
/// `[a-z0-9]` into a single `-` and strips leading and trailing dashes.
///
/// Returns `None` when nothing identifier-safe is left, or when the input
/// holds a letter or digit that has no ASCII spelling.
pub fn normalize_key(raw: &str) -> Option<String> {
    let lowered = raw.trim().to_lowercase();
    let mut key = String::with_capacity(lowered.len());
    let mut pending_dash = false;

    let mut buf = [0; 4];
    for ch in lowered.chars() {
        let folded = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            Some(&*ch.encode_utf8(&mut buf))
        } else {
            fold_latin(ch)
        };
        match folded {
            Some(part) => {
                if pending_dash && !key.is_empty() {
                    key.push('-');
                }
                pending_dash = false;
                key.push_str(part);
            }
            None if ch.is_alphanumeric() => return None,
            None => pending_dash = true,
        }
    }

    (!key.is_empty()).then_some(key)
}

/// ASCII spelling of a lowercase Latin-1 letter
fn fold_latin(ch: char) -> Option<&'static str> {
    let ascii = match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'æ' => "ae",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        _ => return None,
    };
    Some(ascii)
}

/// Trimmed label, `None` when blank
pub fn normalize_label(raw: &str) -> Option<String> {
    let label = raw.trim();
    (!label.is_empty()).then(|| label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize_key(" Sectioning ").as_deref(), Some("sectioning"));
        assert_eq!(normalize_key("MOUNTING").as_deref(), Some("mounting"));
    }

    #[test]
    fn collapses_unsafe_runs() {
        assert_eq!(
            normalize_key("Automated  Sectioning").as_deref(),
            Some("automated-sectioning")
        );
        assert_eq!(
            normalize_key("grinding & polishing").as_deref(),
            Some("grinding-polishing")
        );
        assert_eq!(normalize_key("--hardness_testing--").as_deref(), Some("hardness-testing"));
    }

    #[test]
    fn folds_accented_latin_letters() {
        assert_eq!(normalize_key("Ätzmittel").as_deref(), Some("atzmittel"));
        assert_eq!(normalize_key("Étch 2").as_deref(), Some("etch-2"));
        assert_eq!(normalize_key("Schleifpapier Maße").as_deref(), Some("schleifpapier-masse"));
    }

    #[test]
    fn rejects_letters_without_ascii_spelling() {
        assert_eq!(normalize_key("切割"), None);
        assert_eq!(normalize_key("saw 切割"), None);
    }

    #[test]
    fn already_normal_keys_are_stable() {
        let once = normalize_key("Sample Prep / Cutting").unwrap();
        assert_eq!(normalize_key(&once).as_deref(), Some(once.as_str()));
    }

    #[test]
    fn rejects_empty_results() {
        assert_eq!(normalize_key(""), None);
        assert_eq!(normalize_key("   "), None);
        assert_eq!(normalize_key("---"), None);
    }

    #[test]
    fn labels_are_trimmed() {
        assert_eq!(normalize_label("  Sectioning ").as_deref(), Some("Sectioning"));
        assert_eq!(normalize_label(" \t"), None);
    }
}
