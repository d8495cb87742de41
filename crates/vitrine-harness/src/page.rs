#![forbid(unsafe_code)]

//! In-memory page.
//!
//! Each slot is one root element plus zero or more text regions, all
//! [`RecordingElement`]s, so tests can read back exactly what the engine
//! rendered.

use std::rc::Rc;

use vitrine_core::testing::RecordingElement;
use vitrine_core::{ElementHandle, GroupId, SlotId};
use vitrine_runtime::{Discovery, SlotElements};

#[derive(Debug)]
struct MockSlot {
    id: SlotId,
    root: Rc<RecordingElement>,
    regions: Vec<Rc<RecordingElement>>,
}

/// Builds one group of a [`MockPage`].
#[derive(Debug)]
pub struct GroupBuilder {
    id: GroupId,
    triggers: Vec<SlotId>,
    slots: Vec<MockSlot>,
}

impl GroupBuilder {
    fn new(id: GroupId) -> Self {
        Self {
            id,
            triggers: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Add a slot with one text region per entry in `texts`, and a trigger
    /// bound to it.
    #[must_use]
    pub fn slot(mut self, id: &str, texts: &[&str]) -> Self {
        let slot = SlotId::new(id);
        let root = RecordingElement::labeled(id, "");
        let regions = texts
            .iter()
            .enumerate()
            .map(|(i, text)| RecordingElement::labeled(&format!("{id}/{i}"), text))
            .collect();
        self.triggers.push(slot.clone());
        self.slots.push(MockSlot {
            id: slot,
            root,
            regions,
        });
        self
    }

    /// Add a trigger whose id matches no slot.
    #[must_use]
    pub fn dangling_trigger(mut self, id: &str) -> Self {
        self.triggers.push(SlotId::new(id));
        self
    }

    /// Split the last slot's root into `count` sub-regions.
    #[must_use]
    pub fn with_lines(self, count: usize) -> Self {
        if let Some(slot) = self.slots.last() {
            let lines = (0..count)
                .map(|i| RecordingElement::labeled(&format!("{}#{i}", slot.id), ""))
                .collect();
            slot.root.set_subregions(lines);
        }
        self
    }

    /// Split each text region of the last slot into one sub-region per
    /// character.
    #[must_use]
    pub fn with_split_text(self) -> Self {
        if let Some(slot) = self.slots.last() {
            for region in &slot.regions {
                let chars = region
                    .text()
                    .chars()
                    .enumerate()
                    .map(|(i, c)| {
                        RecordingElement::labeled(&format!("{}~{i}", region.label()), &c.to_string())
                    })
                    .collect();
                region.set_subregions(chars);
            }
        }
        self
    }
}

/// A page with any number of groups.
#[derive(Debug, Default)]
pub struct MockPage {
    groups: Vec<GroupBuilder>,
}

impl MockPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single group whose slots each carry a heading region `"<id> heading"`.
    #[must_use]
    pub fn tabs(group: &str, slots: &[&str]) -> Self {
        let headings: Vec<String> = slots.iter().map(|s| format!("{s} heading")).collect();
        Self::new().group(group, |mut g| {
            for (slot, heading) in slots.iter().zip(&headings) {
                g = g.slot(slot, &[heading.as_str()]);
            }
            g
        })
    }

    /// Add a group.
    #[must_use]
    pub fn group(mut self, id: &str, build: impl FnOnce(GroupBuilder) -> GroupBuilder) -> Self {
        self.groups.push(build(GroupBuilder::new(GroupId::new(id))));
        self
    }

    fn find_group(&self, group: &str) -> Option<&GroupBuilder> {
        self.groups.iter().find(|g| g.id.as_str() == group)
    }

    fn find_slot(&self, group: &str, slot: &str) -> Option<&MockSlot> {
        self.find_group(group)?
            .slots
            .iter()
            .find(|s| s.id.as_str() == slot)
    }

    /// Root element of a slot.
    #[must_use]
    pub fn root(&self, group: &str, slot: &str) -> Option<&Rc<RecordingElement>> {
        self.find_slot(group, slot).map(|s| &s.root)
    }

    /// Text regions of a slot.
    #[must_use]
    pub fn regions(&self, group: &str, slot: &str) -> &[Rc<RecordingElement>] {
        self.find_slot(group, slot)
            .map_or(&[][..], |s| s.regions.as_slice())
    }

    /// Slot ids whose root element is currently rendered, in page order.
    #[must_use]
    pub fn rendered_slots(&self, group: &str) -> Vec<String> {
        self.find_group(group)
            .map(|g| {
                g.slots
                    .iter()
                    .filter(|s| s.root.is_visible())
                    .map(|s| s.id.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every group id.
    #[must_use]
    pub fn group_ids(&self) -> Vec<GroupId> {
        self.groups.iter().map(|g| g.id.clone()).collect()
    }

    /// Slot ids of a group (not triggers).
    #[must_use]
    pub fn slot_ids(&self, group: &str) -> Vec<SlotId> {
        self.find_group(group)
            .map(|g| g.slots.iter().map(|s| s.id.clone()).collect())
            .unwrap_or_default()
    }
}

impl Discovery for MockPage {
    fn list_groups(&self) -> Vec<GroupId> {
        self.group_ids()
    }

    fn list_triggers(&self, group: &GroupId) -> Vec<SlotId> {
        self.find_group(group.as_str())
            .map(|g| g.triggers.clone())
            .unwrap_or_default()
    }

    fn find_slot_by_id(&self, group: &GroupId, slot: &SlotId) -> Option<SlotElements> {
        let s = self.find_slot(group.as_str(), slot.as_str())?;
        Some(SlotElements {
            roots: vec![s.root.handle()],
            text_regions: s.regions.iter().map(|r| r.handle()).collect(),
        })
    }
}
