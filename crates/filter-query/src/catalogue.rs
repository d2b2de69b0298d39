//! Closed name catalogues: source keywords, user and status fields, and
//! relations all share one lookup.

use timeline_model_rs::Relation;

use super::source::SourceKind;
use super::value::{relation_aliases, StatusField, UserField};

/// A closed set of entries, each accepted under one or more spellings.
pub(crate) trait Catalogue: Copy + 'static {
    /// Every entry, in canonical order.
    const ENTRIES: &'static [Self];

    /// Whether lookups must match the spelling's case exactly.
    const CASE_SENSITIVE: bool = false;

    /// Accepted spellings; the first is canonical.
    fn spellings(&self) -> &'static [&'static str];

    /// Finds the entry with a spelling equal to `name`.
    fn lookup(name: &str) -> Option<Self> {
        Self::ENTRIES.iter().copied().find(|entry| {
            entry.spellings().iter().any(|spelling| {
                if Self::CASE_SENSITIVE {
                    *spelling == name
                } else {
                    spelling.eq_ignore_ascii_case(name)
                }
            })
        })
    }

    /// Iterates every spelling of every entry, for suggestions.
    fn all_spellings() -> impl Iterator<Item = &'static str> {
        Self::ENTRIES.iter().flat_map(|entry| entry.spellings().iter().copied())
    }
}

impl Catalogue for SourceKind {
    const ENTRIES: &'static [Self] = &SourceKind::ALL;
    const CASE_SENSITIVE: bool = true;

    fn spellings(&self) -> &'static [&'static str] {
        self.keywords()
    }
}

impl Catalogue for UserField {
    const ENTRIES: &'static [Self] = &UserField::ALL;

    fn spellings(&self) -> &'static [&'static str] {
        self.aliases()
    }
}

impl Catalogue for StatusField {
    const ENTRIES: &'static [Self] = &StatusField::ALL;

    fn spellings(&self) -> &'static [&'static str] {
        self.aliases()
    }
}

impl Catalogue for Relation {
    const ENTRIES: &'static [Self] = &Relation::ALL;

    fn spellings(&self) -> &'static [&'static str] {
        relation_aliases(*self)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn assert_unique<T: Catalogue>(what: &str) {
        let mut seen = HashSet::new();
        for spelling in T::all_spellings() {
            assert!(seen.insert(spelling.to_ascii_lowercase()), "duplicate {what} spelling {spelling}");
        }
    }

    #[test]
    fn test_spellings_are_unique_per_catalogue() {
        assert_unique::<SourceKind>("source");
        assert_unique::<UserField>("user field");
        assert_unique::<StatusField>("status field");
        assert_unique::<Relation>("relation");
    }

    #[test]
    fn test_case_sensitivity_follows_catalogue() {
        assert_eq!(SourceKind::lookup("home"), Some(SourceKind::Home));
        assert_eq!(SourceKind::lookup("HOME"), None);
        assert_eq!(StatusField::lookup("RT"), Some(StatusField::IsRetweet));
        assert_eq!(Relation::lookup("Muted"), Some(Relation::Muting));
    }

    #[test]
    fn test_first_spelling_is_listed_first() {
        let first = UserField::all_spellings().next();
        assert_eq!(first, Some(UserField::ALL[0].name()));
    }
}
