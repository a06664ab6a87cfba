use log::{debug, warn};

use crate::constants::MAX_CELLS;
use crate::error::SelectionError;
use crate::manifest::Manifest;

/// One on/off toggle per known group, kept in manifest order.
///
/// The selection is whatever is checked, read back in toggle order, so the
/// order groups were checked in never affects cell order.
#[derive(Debug, Clone, Default)]
pub struct Toggles {
    entries: Vec<(String, bool)>,
}

impl Toggles {
    pub fn new(manifest: &Manifest) -> Self {
        Self {
            entries: manifest.group_names().map(|name| (name.to_string(), false)).collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_checked(&self, group: &str) -> bool {
        self.entries.iter().any(|(name, checked)| name == group && *checked)
    }

    pub fn checked_count(&self) -> usize {
        self.entries.iter().filter(|(_, checked)| *checked).count()
    }

    pub fn set(&mut self, group: &str, checked: bool) -> Result<(), SelectionError> {
        let full = self.checked_count() >= MAX_CELLS;
        let entry = self
            .entries
            .iter_mut()
            .find(|(name, _)| name == group)
            .ok_or_else(|| SelectionError::UnknownGroup(group.to_string()))?;

        if checked && !entry.1 && full {
            warn!("Ignoring {:?}: already showing {} groups", group, MAX_CELLS);
            return Err(SelectionError::Full);
        }
        entry.1 = checked;
        debug!("Toggle {:?} -> {}", group, checked);
        Ok(())
    }

    /// Flips `group` and returns its new state.
    pub fn toggle(&mut self, group: &str) -> Result<bool, SelectionError> {
        let checked = !self.is_checked(group);
        self.set(group, checked)?;
        Ok(checked)
    }

    /// Replaces the whole selection. Leaves the toggles untouched on error.
    pub fn replace<'a>(&mut self, groups: impl IntoIterator<Item = &'a str>) -> Result<(), SelectionError> {
        let mut next: Vec<bool> = vec![false; self.entries.len()];
        for group in groups {
            let idx = self
                .entries
                .iter()
                .position(|(name, _)| name == group)
                .ok_or_else(|| SelectionError::UnknownGroup(group.to_string()))?;
            next[idx] = true;
        }
        if next.iter().filter(|checked| **checked).count() > MAX_CELLS {
            return Err(SelectionError::Full);
        }
        for (entry, checked) in self.entries.iter_mut().zip(next) {
            entry.1 = checked;
        }
        Ok(())
    }

    /// Checked groups in toggle order.
    pub fn selection(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        Manifest::from_iter([
            ("a", vec!["1.png"]),
            ("b", vec!["2.png"]),
            ("c", vec![]),
            ("d", vec!["3.png"]),
            ("e", vec!["4.png"]),
        ])
    }

    #[test]
    fn selection_follows_toggle_order_not_click_order() {
        let mut toggles = Toggles::new(&manifest());
        toggles.set("d", true).unwrap();
        toggles.set("a", true).unwrap();
        toggles.set("c", true).unwrap();
        assert_eq!(toggles.selection(), vec!["a", "c", "d"]);
    }

    #[test]
    fn toggle_flips_state() {
        let mut toggles = Toggles::new(&manifest());
        assert_eq!(toggles.toggle("b"), Ok(true));
        assert!(toggles.is_checked("b"));
        assert_eq!(toggles.toggle("b"), Ok(false));
        assert!(toggles.selection().is_empty());
    }

    #[test]
    fn fifth_group_is_refused() {
        let mut toggles = Toggles::new(&manifest());
        for group in ["a", "b", "c", "d"] {
            toggles.set(group, true).unwrap();
        }
        assert_eq!(toggles.set("e", true), Err(SelectionError::Full));
        assert_eq!(toggles.selection(), vec!["a", "b", "c", "d"]);
        // Re-checking an already checked group is still fine
        assert_eq!(toggles.set("a", true), Ok(()));
    }

    #[test]
    fn unknown_group_is_an_error() {
        let mut toggles = Toggles::new(&manifest());
        assert_eq!(
            toggles.toggle("zzz"),
            Err(SelectionError::UnknownGroup("zzz".to_string()))
        );
    }

    #[test]
    fn replace_is_all_or_nothing() {
        let mut toggles = Toggles::new(&manifest());
        toggles.replace(["b"]).unwrap();
        assert!(toggles.replace(["a", "nope"]).is_err());
        assert_eq!(toggles.selection(), vec!["b"]);
        assert_eq!(toggles.replace(["a", "b", "c", "d", "e"]), Err(SelectionError::Full));
        assert_eq!(toggles.selection(), vec!["b"]);
        toggles.replace(["e", "a"]).unwrap();
        assert_eq!(toggles.selection(), vec!["a", "e"]);
    }
}
