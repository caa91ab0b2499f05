//! Builds the headers map from a parsed header row: an ordered list of
//! original column names, plus an identifier/alias lookup table.

use indexmap::IndexMap;
use rowfilter_expr::Headers as HeadersContract;
use rowfilter_lexer::{is_identifier, make_valid_identifier};

/// The headers map described by §6: original names in column order, and a
/// lookup table holding both every original name and every synthesised
/// alias, each pointing at its column's zero-based index.
pub struct HeaderTable {
    original_names: Vec<String>,
    lookup: IndexMap<String, usize>,
}

impl HeaderTable {
    pub fn new(original_names: Vec<String>) -> Self {
        let mut lookup: IndexMap<String, usize> = IndexMap::with_capacity(original_names.len());

        for (index, name) in original_names.iter().enumerate() {
            let already_taken = lookup.contains_key(name);
            if is_identifier(name) && !already_taken {
                lookup.insert(name.clone(), index);
                continue;
            }

            if !already_taken {
                lookup.insert(name.clone(), index);
            }

            let base = make_valid_identifier(name);
            let alias = if !lookup.contains_key(&base) {
                base
            } else {
                let mut suffix = 1usize;
                loop {
                    let candidate = format!("{base}{suffix}");
                    if !lookup.contains_key(&candidate) {
                        break candidate;
                    }
                    suffix += 1;
                }
            };
            lookup.insert(alias, index);
        }

        Self { original_names, lookup }
    }

    pub fn original_names(&self) -> &[String] {
        &self.original_names
    }

    pub fn len(&self) -> usize {
        self.original_names.len()
    }

    /// Renders the header→alias table `--show-headers` prints: one line per
    /// column, its original name, and any synthesised aliases that also
    /// resolve to it. Mirrors `Headers::printHeaders` in
    /// `examples/original_source/src/app/headers.cc`.
    pub fn render_table(&self) -> String {
        let mut lines = Vec::with_capacity(self.original_names.len());
        for (index, original) in self.original_names.iter().enumerate() {
            let aliases: Vec<&str> =
                self.lookup.iter().filter(|(name, &i)| i == index && name.as_str() != original.as_str()).map(|(name, _)| name.as_str()).collect();
            if aliases.is_empty() {
                lines.push(format!("{index}: {original}"));
            } else {
                lines.push(format!("{index}: {original} ({})", aliases.join(", ")));
            }
        }
        lines.join("\n")
    }
}

impl HeadersContract for HeaderTable {
    fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_unique_names_are_their_own_key() {
        let h = HeaderTable::new(vec!["a".into(), "b".into()]);
        assert_eq!(h.index_of("a"), Some(0));
        assert_eq!(h.index_of("b"), Some(1));
    }

    #[test]
    fn invalid_identifier_gets_an_alias_alongside_the_original() {
        let h = HeaderTable::new(vec!["1st place".into()]);
        assert_eq!(h.index_of("1st place"), Some(0));
        assert_eq!(h.index_of("_1st_place"), Some(0));
    }

    #[test]
    fn duplicate_names_get_numbered_aliases() {
        let h = HeaderTable::new(vec!["a".into(), "a".into(), "a".into()]);
        assert_eq!(h.index_of("a"), Some(0));
        assert_eq!(h.index_of("a1"), Some(1));
        assert_eq!(h.index_of("a2"), Some(2));
    }

    #[test]
    fn render_table_lists_aliases_next_to_the_original_name() {
        let h = HeaderTable::new(vec!["a".into(), "1st place".into()]);
        assert_eq!(h.render_table(), "0: a\n1: 1st place (_1st_place)");
    }
}
