//! Visual text attributes and their merge rule

use std::collections::BTreeMap;

use serde::Serialize;

use crate::theme::Color;

/// Attribute slots a styled-text sink understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Foreground,
    Background,
    Weight,
    Italic,
    Monospace,
    Strikethrough,
    /// Font size relative to the base font, in percent
    FontScale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Color(Color),
    Weight(FontWeight),
    Flag(bool),
    Percent(u16),
}

/// Key → value map of visual attributes.
///
/// Merging is last-applied-wins per key: keys absent from the incoming set
/// keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<AttributeKey, AttributeValue>);

impl AttributeSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: AttributeKey, value: AttributeValue) -> Self {
        self.0.insert(key, value);
        self
    }

    pub fn foreground(self, color: Color) -> Self {
        self.with(AttributeKey::Foreground, AttributeValue::Color(color))
    }

    pub fn background(self, color: Color) -> Self {
        self.with(AttributeKey::Background, AttributeValue::Color(color))
    }

    pub fn weight(self, weight: FontWeight) -> Self {
        self.with(AttributeKey::Weight, AttributeValue::Weight(weight))
    }

    pub fn italic(self, on: bool) -> Self {
        self.with(AttributeKey::Italic, AttributeValue::Flag(on))
    }

    pub fn monospace(self, on: bool) -> Self {
        self.with(AttributeKey::Monospace, AttributeValue::Flag(on))
    }

    pub fn strikethrough(self, on: bool) -> Self {
        self.with(AttributeKey::Strikethrough, AttributeValue::Flag(on))
    }

    pub fn font_scale(self, percent: u16) -> Self {
        self.with(AttributeKey::FontScale, AttributeValue::Percent(percent))
    }

    pub fn insert(&mut self, key: AttributeKey, value: AttributeValue) {
        self.0.insert(key, value);
    }

    pub fn get(&self, key: AttributeKey) -> Option<AttributeValue> {
        self.0.get(&key).copied()
    }

    pub fn contains(&self, key: AttributeKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, AttributeValue)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Overlay `other` onto `self`
    pub fn merge(&mut self, other: &AttributeSet) {
        for (key, value) in other.iter() {
            self.0.insert(key, value);
        }
    }

    /// `self` with `other` overlaid, leaving both inputs untouched
    pub fn merged(&self, other: &AttributeSet) -> AttributeSet {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}

/// Attribute set with an alternate for ranges that are currently selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleVariant {
    pub normal: AttributeSet,
    pub selected: AttributeSet,
}

impl StyleVariant {
    /// Same attributes whether selected or not
    pub fn uniform(attributes: AttributeSet) -> Self {
        Self {
            selected: attributes.clone(),
            normal: attributes,
        }
    }

    pub fn new(normal: AttributeSet, selected: AttributeSet) -> Self {
        Self { normal, selected }
    }

    pub fn pick(&self, selected: bool) -> &AttributeSet {
        if selected {
            &self.selected
        } else {
            &self.normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_only_present_keys() {
        let base = AttributeSet::new()
            .foreground(Color::rgb(1, 1, 1))
            .weight(FontWeight::Regular);
        let bold = AttributeSet::new().weight(FontWeight::Bold);

        let merged = base.merged(&bold);
        assert_eq!(
            merged.get(AttributeKey::Foreground),
            Some(AttributeValue::Color(Color::rgb(1, 1, 1)))
        );
        assert_eq!(
            merged.get(AttributeKey::Weight),
            Some(AttributeValue::Weight(FontWeight::Bold))
        );
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_last_applied_wins() {
        let mut set = AttributeSet::new().italic(false);
        set.merge(&AttributeSet::new().italic(true));
        set.merge(&AttributeSet::new().monospace(true));
        assert_eq!(
            set.get(AttributeKey::Italic),
            Some(AttributeValue::Flag(true))
        );
        assert!(set.contains(AttributeKey::Monospace));
    }

    #[test]
    fn test_variant_pick() {
        let variant = StyleVariant::new(
            AttributeSet::new().foreground(Color::rgb(0, 0, 0)),
            AttributeSet::new().foreground(Color::rgb(9, 9, 9)),
        );
        assert_eq!(
            variant.pick(true).get(AttributeKey::Foreground),
            Some(AttributeValue::Color(Color::rgb(9, 9, 9)))
        );
        assert_eq!(
            variant.pick(false).get(AttributeKey::Foreground),
            Some(AttributeValue::Color(Color::rgb(0, 0, 0)))
        );
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let set = AttributeSet::new()
            .foreground(Color::rgb(0xff, 0, 0))
            .weight(FontWeight::Bold)
            .strikethrough(true);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(
            json,
            r##"{"foreground":"#ff0000","weight":"bold","strikethrough":true}"##
        );
    }
}
