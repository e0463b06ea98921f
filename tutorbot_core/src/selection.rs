//! Access to the host page's current text selection.

use std::sync::{Arc, PoisonError, RwLock};

/// Synchronous, side-effect free read of the highlighted text.
///
/// Implementations return the selection already normalized: trimmed, and
/// `None` when nothing meaningful is selected.
pub trait SelectionSource: Send + Sync {
    fn capture(&self) -> Option<String>;
}

impl<T> SelectionSource for Arc<T>
where
    T: SelectionSource + ?Sized,
{
    fn capture(&self) -> Option<String> {
        (**self).capture()
    }
}

/// Trim raw selection text; blank selections count as no selection.
#[must_use]
pub fn normalize_selection(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A host without any selection capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSelection;

impl SelectionSource for NoSelection {
    fn capture(&self) -> Option<String> {
        None
    }
}

/// A selection slot the host writes into and the controller reads from.
///
/// Clones share the same slot, so the presentation layer can keep one handle
/// while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct SharedSelection {
    current: Arc<RwLock<Option<String>>>,
}

impl SharedSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the highlighted text, as the host does when the reader
    /// selects something on the page.
    pub fn select(&self, text: impl Into<String>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(text.into());
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SelectionSource for SharedSelection {
    fn capture(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            .and_then(normalize_selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_blank() {
        assert_eq!(
            normalize_selection("  torque control\n"),
            Some("torque control".to_string())
        );
        assert_eq!(normalize_selection(""), None);
        assert_eq!(normalize_selection(" \t\n "), None);
    }

    #[test]
    fn shared_handles_are_sources() {
        let host = SharedSelection::new();
        host.select("  inverse kinematics ");

        let erased: Arc<dyn SelectionSource> = Arc::new(host);
        assert_eq!(erased.capture(), Some("inverse kinematics".to_string()));
    }

    #[test]
    fn shared_selection_is_visible_through_clones() {
        let host = SharedSelection::new();
        let reader = host.clone();
        assert_eq!(reader.capture(), None);

        host.select("  torque control ");
        assert_eq!(reader.capture(), Some("torque control".to_string()));

        host.select("   ");
        assert_eq!(reader.capture(), None);

        host.select("zero moment point");
        host.clear();
        assert_eq!(reader.capture(), None);
    }

    #[test]
    fn no_selection_never_captures() {
        assert_eq!(NoSelection.capture(), None);
    }
}
