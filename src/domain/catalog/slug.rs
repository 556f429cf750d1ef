//! URL slug generation and collision resolution for class occurrences.

use async_trait::async_trait;

use crate::domain::foundation::{ClassOccurrenceId, DomainError};

use super::errors::CatalogError;

/// Upper bound on numeric suffixes tried before giving up.
pub const MAX_SLUG_SUFFIX: u32 = 1000;

/// Looks up which class occurrence, if any, currently owns a slug.
#[async_trait]
pub trait SlugLookup: Send + Sync {
    async fn find_id_by_slug(&self, slug: &str) -> Result<Option<ClassOccurrenceId>, DomainError>;
}

/// Normalizes a human-readable title into a URL slug.
///
/// The result contains only `[a-z0-9-]`, with no leading, trailing, or
/// doubled hyphens. Characters outside that set (including accented
/// letters) are dropped rather than transliterated.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.trim().to_lowercase().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = true;
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        }
    }

    slug
}

/// Finds the first free slug among `base`, `base-1`, `base-2`, ...
///
/// A slug held by `exclude` (the record being updated) counts as free.
/// Gives up with `SlugExhausted` after [`MAX_SLUG_SUFFIX`] suffixes.
pub async fn resolve_unique_slug(
    base: &str,
    exclude: Option<&ClassOccurrenceId>,
    lookup: &dyn SlugLookup,
) -> Result<String, CatalogError> {
    resolve_unique_slug_with_limit(base, exclude, lookup, MAX_SLUG_SUFFIX).await
}

pub(crate) async fn resolve_unique_slug_with_limit(
    base: &str,
    exclude: Option<&ClassOccurrenceId>,
    lookup: &dyn SlugLookup,
    max_suffix: u32,
) -> Result<String, CatalogError> {
    let mut candidate = base.to_string();
    let mut counter: u32 = 1;

    loop {
        match lookup.find_id_by_slug(&candidate).await? {
            None => return Ok(candidate),
            Some(owner) if Some(&owner) == exclude => return Ok(candidate),
            Some(_) => {}
        }

        if counter > max_suffix {
            tracing::warn!(base_slug = %base, attempts = counter, "Slug suffixes exhausted");
            return Err(CatalogError::SlugExhausted {
                base: base.to_string(),
                attempts: counter,
            });
        }

        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct FakeSlugs {
        owners: Mutex<HashMap<String, ClassOccurrenceId>>,
        lookups: AtomicU32,
    }

    impl FakeSlugs {
        fn new() -> Self {
            Self {
                owners: Mutex::new(HashMap::new()),
                lookups: AtomicU32::new(0),
            }
        }

        fn claim(&self, slug: &str, id: ClassOccurrenceId) {
            self.owners.lock().unwrap().insert(slug.to_string(), id);
        }
    }

    #[async_trait]
    impl SlugLookup for FakeSlugs {
        async fn find_id_by_slug(
            &self,
            slug: &str,
        ) -> Result<Option<ClassOccurrenceId>, DomainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.owners.lock().unwrap().get(slug).copied())
        }
    }

    // ══════════════════════════════════════════════════════════════
    // slugify
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn slugify_lowercases_and_hyphenates_whitespace() {
        assert_eq!(slugify("Salsa Beginners Night"), "salsa-beginners-night");
    }

    #[test]
    fn slugify_trims_and_collapses_whitespace_runs() {
        assert_eq!(slugify("  Bachata \t  Level   2  "), "bachata-level-2");
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(slugify("Rock 'n' Roll! (Advanced)"), "rock-n-roll-advanced");
    }

    #[test]
    fn slugify_collapses_hyphen_runs_and_strips_edges() {
        assert_eq!(slugify("--Lindy -- Hop--"), "lindy-hop");
    }

    #[test]
    fn slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Tango"), "caf-tango");
    }

    #[test]
    fn slugify_of_symbols_only_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
    }

    proptest! {
        #[test]
        fn slugify_output_uses_only_slug_charset(title in ".{0,64}") {
            let slug = slugify(&title);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn slugify_output_has_no_edge_or_doubled_hyphens(title in ".{0,64}") {
            let slug = slugify(&title);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn slugify_is_idempotent(title in ".{0,64}") {
            let once = slugify(&title);
            prop_assert_eq!(slugify(&once), once);
        }
    }

    // ══════════════════════════════════════════════════════════════
    // resolve_unique_slug
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn free_base_slug_is_returned_as_is() {
        let slugs = FakeSlugs::new();
        let slug = resolve_unique_slug("salsa", None, &slugs).await.unwrap();
        assert_eq!(slug, "salsa");
    }

    #[tokio::test]
    async fn taken_base_slug_gets_first_free_suffix() {
        let slugs = FakeSlugs::new();
        slugs.claim("salsa", ClassOccurrenceId::new());
        slugs.claim("salsa-1", ClassOccurrenceId::new());

        let slug = resolve_unique_slug("salsa", None, &slugs).await.unwrap();
        assert_eq!(slug, "salsa-2");
    }

    #[tokio::test]
    async fn slug_owned_by_excluded_record_is_kept() {
        let slugs = FakeSlugs::new();
        let own_id = ClassOccurrenceId::new();
        slugs.claim("salsa", own_id);

        let slug = resolve_unique_slug("salsa", Some(&own_id), &slugs).await.unwrap();
        assert_eq!(slug, "salsa");
    }

    #[tokio::test]
    async fn successive_claims_get_distinct_slugs() {
        let slugs = FakeSlugs::new();
        let mut assigned = Vec::new();
        for _ in 0..5 {
            let slug = resolve_unique_slug("kizomba", None, &slugs).await.unwrap();
            slugs.claim(&slug, ClassOccurrenceId::new());
            assigned.push(slug);
        }
        assert_eq!(
            assigned,
            vec!["kizomba", "kizomba-1", "kizomba-2", "kizomba-3", "kizomba-4"]
        );
    }

    #[tokio::test]
    async fn exhausted_suffixes_fail_after_bounded_lookups() {
        let slugs = FakeSlugs::new();
        slugs.claim("tap", ClassOccurrenceId::new());
        for n in 1..=3 {
            slugs.claim(&format!("tap-{}", n), ClassOccurrenceId::new());
        }

        let result = resolve_unique_slug_with_limit("tap", None, &slugs, 3).await;

        assert!(matches!(
            result,
            Err(CatalogError::SlugExhausted { ref base, attempts: 4 }) if base == "tap"
        ));
        assert_eq!(slugs.lookups.load(Ordering::SeqCst), 4);
    }
}
