/// Derives a URL-safe project id from a title.
///
/// Lowercases ASCII letters and collapses every run of other characters into
/// a single hyphen, trimming hyphens at both ends: `"Mountain Series"`
/// becomes `"mountain-series"`. The result is not guaranteed unique; the
/// create precondition catches collisions.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Mountain Series"), "mountain-series");
        assert_eq!(slugify("Urban Decay 2024"), "urban-decay-2024");
    }

    #[test]
    fn collapses_runs_and_trims_edges() {
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("--already--slugged--"), "already-slugged");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Café at Niña's"), "caf-at-ni-a-s");
    }

    #[test]
    fn unusable_titles_become_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }
}
