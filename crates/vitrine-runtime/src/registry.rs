#![forbid(unsafe_code)]

//! Group, slot, and trigger bindings.
//!
//! A [`Discovery`] source (a DOM bridge, a widget tree, a test page) is
//! queried once; the resulting [`Registry`] is immutable afterwards.
//!
//! Triggers are identified by the slot id they target. A trigger whose id
//! has no matching slot is kept as registered so that activating it can be
//! reported as a lookup failure.

use std::collections::BTreeMap;
use std::fmt;

use vitrine_core::{ElementRef, GroupId, LookupError, SlotId};

/// Elements a discovery source returns for one slot.
#[derive(Clone, Default)]
pub struct SlotElements {
    /// Elements shown and hidden as a unit.
    pub roots: Vec<ElementRef>,
    /// Elements whose text is scrambled in when the slot enters.
    pub text_regions: Vec<ElementRef>,
}

impl fmt::Debug for SlotElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotElements")
            .field("roots", &self.roots.len())
            .field("text_regions", &self.text_regions.len())
            .finish()
    }
}

/// Read-only view of the page's bindings.
pub trait Discovery {
    /// All group ids, in page order.
    fn list_groups(&self) -> Vec<GroupId>;

    /// Trigger ids registered for `group`, in page order.
    fn list_triggers(&self, group: &GroupId) -> Vec<SlotId>;

    /// The slot `slot` inside `group`, if it exists.
    fn find_slot_by_id(&self, group: &GroupId, slot: &SlotId) -> Option<SlotElements>;
}

/// A text element and the text it showed at registration.
#[derive(Clone)]
pub struct TextRegion {
    pub element: ElementRef,
    pub text: String,
}

impl fmt::Debug for TextRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRegion")
            .field("element", &self.element.id())
            .field("text", &self.text)
            .finish()
    }
}

/// A content slot.
#[derive(Clone)]
pub struct Slot {
    id: SlotId,
    roots: Vec<ElementRef>,
    text_regions: Vec<TextRegion>,
}

impl Slot {
    /// Capture a slot; text regions keep their current text as canonical.
    #[must_use]
    pub fn new(id: SlotId, elements: SlotElements) -> Self {
        let text_regions = elements
            .text_regions
            .into_iter()
            .map(|element| {
                let text = element.text();
                TextRegion { element, text }
            })
            .collect();
        Self {
            id,
            roots: elements.roots,
            text_regions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SlotId {
        &self.id
    }

    #[must_use]
    pub fn roots(&self) -> &[ElementRef] {
        &self.roots
    }

    #[must_use]
    pub fn text_regions(&self) -> &[TextRegion] {
        &self.text_regions
    }

    /// Roots followed by text regions.
    pub fn elements(&self) -> impl Iterator<Item = &ElementRef> + '_ {
        self.roots
            .iter()
            .chain(self.text_regions.iter().map(|r| &r.element))
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("id", &self.id)
            .field("roots", &self.roots.len())
            .field("text_regions", &self.text_regions)
            .finish()
    }
}

/// A trigger: issues a selection of `slot` within `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trigger {
    pub group: GroupId,
    pub slot: SlotId,
}

impl Trigger {
    #[must_use]
    pub fn new(group: impl Into<GroupId>, slot: impl Into<SlotId>) -> Self {
        Self {
            group: group.into(),
            slot: slot.into(),
        }
    }
}

/// A named set of mutually exclusive slots.
#[derive(Debug, Clone)]
pub struct Group {
    id: GroupId,
    slots: Vec<Slot>,
    triggers: Vec<SlotId>,
}

impl Group {
    #[must_use]
    pub fn id(&self) -> &GroupId {
        &self.id
    }

    /// Slots in trigger order (each bound slot once).
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Trigger ids in registration order, including dangling ones.
    #[must_use]
    pub fn triggers(&self) -> &[SlotId] {
        &self.triggers
    }

    #[must_use]
    pub fn slot(&self, id: &SlotId) -> Option<&Slot> {
        self.slots.iter().find(|s| s.id() == id)
    }

    /// Slot bound to the first trigger that resolves.
    #[must_use]
    pub fn default_slot(&self) -> Option<&Slot> {
        self.triggers.iter().find_map(|t| self.slot(t))
    }
}

/// Immutable bindings for every group on the page.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    groups: BTreeMap<GroupId, Group>,
    order: Vec<GroupId>,
}

impl Registry {
    /// Query `source` once and capture its bindings.
    #[must_use]
    pub fn discover<D: Discovery + ?Sized>(source: &D) -> Self {
        let mut registry = Self::default();
        for group_id in source.list_groups() {
            if registry.groups.contains_key(&group_id) {
                continue;
            }
            let triggers = source.list_triggers(&group_id);
            let mut slots: Vec<Slot> = Vec::new();
            let mut dangling = 0usize;
            for trigger in &triggers {
                if slots.iter().any(|s| s.id() == trigger) {
                    continue;
                }
                match source.find_slot_by_id(&group_id, trigger) {
                    Some(elements) => slots.push(Slot::new(trigger.clone(), elements)),
                    None => dangling += 1,
                }
            }
            tracing::debug!(
                group = %group_id,
                triggers = triggers.len(),
                slots = slots.len(),
                dangling,
                "group discovered"
            );
            registry.order.push(group_id.clone());
            registry.groups.insert(
                group_id.clone(),
                Group {
                    id: group_id,
                    slots,
                    triggers,
                },
            );
        }
        registry
    }

    /// Groups in discovery order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.order.iter().filter_map(|id| self.groups.get(id))
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.get(id)
    }

    /// Resolve `(group, slot)`, naming whichever part is missing.
    pub fn lookup(&self, group: &GroupId, slot: &SlotId) -> Result<&Slot, LookupError> {
        let g = self
            .groups
            .get(group)
            .ok_or_else(|| LookupError::UnknownGroup {
                group: group.clone(),
            })?;
        g.slot(slot).ok_or_else(|| LookupError::UnknownSlot {
            group: group.clone(),
            slot: slot.clone(),
        })
    }

    /// Every registered trigger, in group then page order.
    #[must_use]
    pub fn triggers(&self) -> Vec<Trigger> {
        self.groups()
            .flat_map(|g| {
                g.triggers().iter().map(|s| Trigger {
                    group: g.id().clone(),
                    slot: s.clone(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use vitrine_core::testing::RecordingElement;

    struct Page {
        groups: Vec<(GroupId, Vec<SlotId>, Vec<(SlotId, Rc<RecordingElement>)>)>,
    }

    impl Discovery for Page {
        fn list_groups(&self) -> Vec<GroupId> {
            self.groups.iter().map(|(g, _, _)| g.clone()).collect()
        }

        fn list_triggers(&self, group: &GroupId) -> Vec<SlotId> {
            self.groups
                .iter()
                .find(|(g, _, _)| g == group)
                .map(|(_, t, _)| t.clone())
                .unwrap_or_default()
        }

        fn find_slot_by_id(&self, group: &GroupId, slot: &SlotId) -> Option<SlotElements> {
            let (_, _, slots) = self.groups.iter().find(|(g, _, _)| g == group)?;
            let (_, el) = slots.iter().find(|(s, _)| s == slot)?;
            Some(SlotElements {
                roots: vec![el.handle()],
                text_regions: vec![el.handle()],
            })
        }
    }

    fn page() -> Page {
        Page {
            groups: vec![(
                GroupId::new("tabs"),
                vec!["ghost".into(), "a".into(), "b".into(), "a".into()],
                vec![
                    ("a".into(), RecordingElement::new("Alpha")),
                    ("b".into(), RecordingElement::new("Beta")),
                ],
            )],
        }
    }

    #[test]
    fn discovers_slots_and_keeps_dangling_triggers() {
        let registry = Registry::discover(&page());
        let group = registry.group(&"tabs".into()).unwrap();
        assert_eq!(group.slots().len(), 2);
        assert_eq!(group.triggers().len(), 4);
        assert_eq!(group.default_slot().unwrap().id().as_str(), "a");
    }

    #[test]
    fn canonical_text_captured_at_registration() {
        let registry = Registry::discover(&page());
        let slot = registry.lookup(&"tabs".into(), &"b".into()).unwrap();
        assert_eq!(slot.text_regions()[0].text, "Beta");
        assert_eq!(slot.elements().count(), 2);
    }

    #[test]
    fn lookup_names_missing_part() {
        let registry = Registry::discover(&page());
        assert!(matches!(
            registry.lookup(&"nope".into(), &"a".into()),
            Err(LookupError::UnknownGroup { .. })
        ));
        assert!(matches!(
            registry.lookup(&"tabs".into(), &"ghost".into()),
            Err(LookupError::UnknownSlot { .. })
        ));
    }

    #[test]
    fn triggers_flattened_in_order() {
        let registry = Registry::discover(&page());
        let triggers = registry.triggers();
        assert_eq!(triggers[0], Trigger::new("tabs", "ghost"));
        assert_eq!(triggers.len(), 4);
    }

    #[test]
    fn empty_source() {
        let registry = Registry::discover(&Page { groups: Vec::new() });
        assert!(registry.is_empty());
        assert!(registry.triggers().is_empty());
    }
}
