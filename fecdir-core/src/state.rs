use crate::config::Vocabulary;
use crate::text::{fold, has_token};
use crate::types::AdministrativeState;

/// Find the first known province mentioned on a page.
///
/// Regions are tried in vocabulary order. A line that also carries the `av`
/// abbreviation is ignored for the match: streets are often named after
/// provinces ("Av. Kasai").
pub fn detect(vocabulary: &Vocabulary, page_text: &str) -> Option<AdministrativeState> {
    let lines: Vec<(String, bool)> = page_text
        .lines()
        .map(|line| (fold(line), has_token(line, "av") || has_token(line, "av.")))
        .collect();

    vocabulary.regions.iter().find_map(|region| {
        let needle = fold(region);
        lines
            .iter()
            .any(|(folded, street)| !street && folded.contains(&needle))
            .then(|| AdministrativeState::new(region.clone()))
    })
}

/// Carries the last detected province from page to page
pub struct StateTracker<'a> {
    vocabulary: &'a Vocabulary,
    current: Option<AdministrativeState>,
}

impl<'a> StateTracker<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self {
            vocabulary,
            current: None,
        }
    }

    /// Scan a page; the carried state only changes on a positive detection
    pub fn observe(&mut self, page_text: &str) -> Option<&AdministrativeState> {
        if let Some(state) = detect(self.vocabulary, page_text) {
            if self.current.as_ref() != Some(&state) {
                tracing::debug!("administrative state -> {state}");
            }
            self.current = Some(state);
        }
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&AdministrativeState> {
        self.current.as_ref()
    }
}
