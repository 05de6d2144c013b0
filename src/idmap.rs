//! Identifier → output file table for packaged output.
//!
//! When a document is split into one file per top-level division, a link to
//! `#id` only works if it names the file that ended up holding `id`. The
//! [`IdentifierMap`] is built once, before any chapter renders, and is then
//! shared read-only through the render context.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::{Error, Result};
use crate::tree::{Document, Element, collapse_whitespace};
use crate::vocab::{Section, Tag};

/// A top-level division and the file it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Division {
    pub section: Section,
    /// 1-based position within its section.
    pub index: usize,
    pub file: String,
    pub id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct IdentifierMap {
    ids: BTreeMap<String, String>,
    divisions: Vec<Division>,
}

impl IdentifierMap {
    /// Assign every division a file and record where each identifier lands.
    ///
    /// Divisions are the `div` children of `front`, `body` and `back`, in that
    /// order. Identifiers are unique across the whole text; a repeat is an
    /// error naming both locations.
    pub fn build(doc: &Document) -> Result<IdentifierMap> {
        if doc.section(Section::Body).is_none() {
            return Err(Error::MissingSection(Section::Body.as_str()));
        }

        let mut map = IdentifierMap::default();
        // Identifiers outside any division still take part in the
        // uniqueness check; they are keyed to their section.
        let mut loose: BTreeMap<String, &'static str> = BTreeMap::new();

        for section in Section::ALL {
            let Some(section_el) = doc.section(section) else {
                continue;
            };

            let mut index = 0;
            for child in section_el.elements() {
                if child.is(Tag::Div) {
                    index += 1;
                    let file = format!("{}-{index:04}.xhtml", section.file_prefix());
                    map.add_division(section, index, file, child, &loose)?;
                } else {
                    for el in child.descendants() {
                        if let Some(id) = el.id() {
                            map.check_loose(id, section.as_str(), &mut loose)?;
                        }
                    }
                }
            }
        }

        tracing::debug!(
            divisions = map.divisions.len(),
            ids = map.ids.len(),
            "built identifier map"
        );
        Ok(map)
    }

    fn add_division(
        &mut self,
        section: Section,
        index: usize,
        file: String,
        div: &Element,
        loose: &BTreeMap<String, &'static str>,
    ) -> Result<()> {
        for el in div.descendants() {
            let Some(id) = el.id() else {
                continue;
            };
            if let Some(first) = loose.get(id) {
                return Err(duplicate(id, first, &file));
            }
            match self.ids.entry(id.to_string()) {
                Entry::Occupied(entry) => return Err(duplicate(id, entry.get(), &file)),
                Entry::Vacant(entry) => {
                    entry.insert(file.clone());
                }
            }
        }

        let title = div
            .child(Tag::Head)
            .map(|h| collapse_whitespace(&h.text()))
            .filter(|t| !t.is_empty());
        self.divisions.push(Division {
            section,
            index,
            file,
            id: div.id().map(str::to_string),
            title,
        });
        Ok(())
    }

    fn check_loose(
        &self,
        id: &str,
        location: &'static str,
        loose: &mut BTreeMap<String, &'static str>,
    ) -> Result<()> {
        if let Some(first) = self.ids.get(id) {
            return Err(duplicate(id, first, location));
        }
        match loose.entry(id.to_string()) {
            Entry::Occupied(entry) => Err(duplicate(id, entry.get(), location)),
            Entry::Vacant(entry) => {
                entry.insert(location);
                Ok(())
            }
        }
    }

    /// File holding `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.ids.get(id).map(String::as_str)
    }

    /// Link target for `id`: `file#id`.
    pub fn resolve(&self, id: &str) -> Option<String> {
        self.get(id).map(|file| format!("{file}#{id}"))
    }

    /// Divisions in output order.
    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    /// Number of mapped identifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// `(id, file)` pairs ordered by identifier.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Division elements in output order, matching [`IdentifierMap::divisions`].
pub(crate) fn division_elements(doc: &Document) -> Vec<&Element> {
    Section::ALL
        .into_iter()
        .filter_map(|section| doc.section(section))
        .flat_map(|section| section.children_tagged(Tag::Div))
        .collect()
}

fn duplicate(id: &str, first: &str, second: &str) -> Error {
    Error::DuplicateId {
        id: id.to_string(),
        first: first.to_string(),
        second: second.to_string(),
    }
}
