//! Splits free-text completions into labeled lists.
//!
//! A completion is read line by line. A line containing a configured marker
//! (plain substring, case-sensitive, anywhere in the line) switches the active
//! section and is itself discarded, even if other text follows the marker.
//! Every other line is stripped of bullet/numbering decoration and appended to
//! the active section. Lines seen before any marker are dropped.
//!
//! With no markers configured the parser runs in flat mode: every non-empty
//! cleaned line goes into a single unlabeled list.

/// Maps a literal marker substring to the section it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarker {
    pub marker: String,
    pub section: String,
}

impl SectionMarker {
    pub fn new(marker: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            section: section.into(),
        }
    }
}

/// One labeled section of a parsed completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub items: Vec<String>,
}

/// Result of [`SectionParser::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSections {
    /// Every configured section, in first-declaration order. Sections that
    /// never received an item are present with an empty list.
    Labeled(Vec<Section>),
    /// Flat mode output.
    Flat(Vec<String>),
}

impl ParsedSections {
    /// Items of the named section; empty for unknown names and in flat mode.
    #[cfg(test)]
    pub(crate) fn section(&self, name: &str) -> &[String] {
        match self {
            ParsedSections::Labeled(sections) => sections
                .iter()
                .find(|s| s.name == name)
                .map(|s| s.items.as_slice())
                .unwrap_or(&[]),
            ParsedSections::Flat(_) => &[],
        }
    }

    /// Move the named section's items out, leaving it empty.
    pub fn take_section(&mut self, name: &str) -> Vec<String> {
        match self {
            ParsedSections::Labeled(sections) => sections
                .iter_mut()
                .find(|s| s.name == name)
                .map(|s| std::mem::take(&mut s.items))
                .unwrap_or_default(),
            ParsedSections::Flat(_) => Vec::new(),
        }
    }

    /// All items in one list: flat items as-is, labeled items section by section.
    pub fn into_flat(self) -> Vec<String> {
        match self {
            ParsedSections::Labeled(sections) => {
                sections.into_iter().flat_map(|s| s.items).collect()
            }
            ParsedSections::Flat(items) => items,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            ParsedSections::Labeled(sections) => sections.iter().map(|s| s.items.len()).sum(),
            ParsedSections::Flat(items) => items.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SectionParser {
    markers: Vec<SectionMarker>,
    /// Index into `sections` for each entry of `markers`.
    slots: Vec<usize>,
    sections: Vec<String>,
}

impl SectionParser {
    /// Labeled mode. Marker order is match priority; several markers may
    /// target the same section. Empty marker strings are ignored since they
    /// would match every line.
    pub fn new(markers: impl IntoIterator<Item = SectionMarker>) -> Self {
        let markers: Vec<SectionMarker> = markers
            .into_iter()
            .filter(|m| !m.marker.is_empty())
            .collect();

        let mut sections: Vec<String> = Vec::new();
        let slots = markers
            .iter()
            .map(|m| match sections.iter().position(|s| *s == m.section) {
                Some(idx) => idx,
                None => {
                    sections.push(m.section.clone());
                    sections.len() - 1
                }
            })
            .collect();

        Self {
            markers,
            slots,
            sections,
        }
    }

    /// Flat mode: no markers, one unlabeled list.
    pub fn flat() -> Self {
        Self::new(Vec::new())
    }

    pub fn is_flat(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn parse(&self, text: &str) -> ParsedSections {
        if self.is_flat() {
            return ParsedSections::Flat(
                text.split('\n')
                    .filter_map(clean_item)
                    .map(str::to_string)
                    .collect(),
            );
        }

        let mut sections: Vec<Section> = self
            .sections
            .iter()
            .map(|name| Section {
                name: name.clone(),
                items: Vec::new(),
            })
            .collect();
        let mut active: Option<usize> = None;

        for line in text.split('\n') {
            if let Some(slot) = self.match_marker(line) {
                active = Some(slot);
                continue;
            }

            if let (Some(slot), Some(item)) = (active, clean_item(line)) {
                sections[slot].items.push(item.to_string());
            }
        }

        ParsedSections::Labeled(sections)
    }

    fn match_marker(&self, line: &str) -> Option<usize> {
        self.markers
            .iter()
            .position(|m| line.contains(m.marker.as_str()))
            .map(|idx| self.slots[idx])
    }
}

fn is_decoration(c: char) -> bool {
    matches!(c, '•' | '-' | '.' | '0'..='9') || c.is_whitespace()
}

/// Strip bullet and numbering decoration from both ends of `line`.
///
/// Returns `None` when nothing is left. Digits are stripped from the end as
/// well, so a trailing number is lost along with any list numbering.
pub fn clean_item(line: &str) -> Option<&str> {
    let item = line.trim_matches(is_decoration);
    (!item.is_empty()).then_some(item)
}
