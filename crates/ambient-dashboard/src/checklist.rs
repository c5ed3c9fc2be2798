//! Remote triage checklist

use serde::Serialize;

/// Checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistItem {
    /// Breaker not tripped
    Breaker,
    /// Filter not clogged
    Filter,
    /// Thermostat in heat mode
    Mode,
    /// Setpoint above room temperature
    Setpoint,
}

impl ChecklistItem {
    /// Every item in display order
    pub const ALL: [Self; 4] = [Self::Breaker, Self::Filter, Self::Mode, Self::Setpoint];

    /// Operator-facing label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Breaker => "Breaker checked",
            Self::Filter => "Filter inspected",
            Self::Mode => "Thermostat mode verified",
            Self::Setpoint => "Setpoint confirmed",
        }
    }
}

/// Checked state of every item; lives as long as the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Checklist {
    breaker: bool,
    filter: bool,
    mode: bool,
    setpoint: bool,
}

impl Checklist {
    const fn slot(&mut self, item: ChecklistItem) -> &mut bool {
        match item {
            ChecklistItem::Breaker => &mut self.breaker,
            ChecklistItem::Filter => &mut self.filter,
            ChecklistItem::Mode => &mut self.mode,
            ChecklistItem::Setpoint => &mut self.setpoint,
        }
    }

    /// Flip one item and return its new state
    pub const fn toggle(&mut self, item: ChecklistItem) -> bool {
        let slot = self.slot(item);
        *slot = !*slot;
        *slot
    }

    /// Whether an item is checked
    pub const fn is_checked(&self, item: ChecklistItem) -> bool {
        match item {
            ChecklistItem::Breaker => self.breaker,
            ChecklistItem::Filter => self.filter,
            ChecklistItem::Mode => self.mode,
            ChecklistItem::Setpoint => self.setpoint,
        }
    }

    /// Number of checked items
    pub fn completed(&self) -> usize {
        ChecklistItem::ALL
            .into_iter()
            .filter(|item| self.is_checked(*item))
            .count()
    }

    /// Whether every item is checked
    pub fn is_complete(&self) -> bool {
        self.completed() == ChecklistItem::ALL.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_items_toggle_independently() {
        let mut checklist = Checklist::default();
        assert!(checklist.toggle(ChecklistItem::Filter));
        assert!(checklist.is_checked(ChecklistItem::Filter));
        assert!(!checklist.is_checked(ChecklistItem::Breaker));
        assert_eq!(checklist.completed(), 1);

        assert!(!checklist.toggle(ChecklistItem::Filter));
        assert_eq!(checklist.completed(), 0);
    }

    #[test]
    fn test_complete() {
        let mut checklist = Checklist::default();
        for item in ChecklistItem::ALL {
            checklist.toggle(item);
        }
        assert!(checklist.is_complete());
    }

    #[test]
    fn test_serializes_by_item() {
        let mut checklist = Checklist::default();
        checklist.toggle(ChecklistItem::Setpoint);
        assert_eq!(
            serde_json::to_value(checklist).ok(),
            Some(serde_json::json!({
                "breaker": false,
                "filter": false,
                "mode": false,
                "setpoint": true
            }))
        );
    }
}
