#![forbid(unsafe_code)]

//! Exclusive selection per group.
//!
//! [`SelectionController`] owns every group's [`ActiveState`]; nothing else
//! writes it. A select request resolves the target slot, cancels whatever
//! the group still has in flight, then schedules hides for the visible slots
//! and a show (with text reveals) for the target on the group's
//! [`TransitionScheduler`].
//!
//! # State machine
//!
//! ```text
//! (uninitialized) --initialize--> Transitioning(None, default)
//! Settled(x)        --select(y)--> Transitioning(Some(x), y)
//! Transitioning(_, y) --select(z)--> cancel in-flight, Transitioning(Some(y), z)
//! Transitioning(_, y) --scheduler idle--> Settled(y)
//! ```
//!
//! # Invariants
//!
//! 1. Once a group's scheduler is idle, exactly one of its slots is visible.
//! 2. A failed lookup changes nothing and is reported to the sink once.
//! 3. Select requests are applied in call order.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use vitrine_core::{GroupId, LookupError, SlotId, VisualState};

use crate::config::SwitcherConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::registry::{Discovery, Registry, Slot, Trigger};
use crate::scheduler::{StartOffset, TransitionEntry, TransitionScheduler};

/// Where a group is in its selection lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPhase {
    /// Transitions finished; `0` is the only visible slot.
    Settled(SlotId),
    /// Transitions toward `to` are scheduled or running.
    Transitioning { from: Option<SlotId>, to: SlotId },
}

impl GroupPhase {
    /// The slot that is, or is becoming, active.
    #[must_use]
    pub fn slot(&self) -> &SlotId {
        match self {
            Self::Settled(slot) | Self::Transitioning { to: slot, .. } => slot,
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }
}

/// Authoritative record of a group's selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    phase: GroupPhase,
    visible: Vec<SlotId>,
}

impl ActiveState {
    /// Active (or most recently requested) slot.
    #[must_use]
    pub fn slot(&self) -> &SlotId {
        self.phase.slot()
    }

    #[must_use]
    pub fn phase(&self) -> &GroupPhase {
        &self.phase
    }

    /// Slots on screen: the target plus, until the group settles, any slot
    /// still fading out.
    #[must_use]
    pub fn visible(&self) -> &[SlotId] {
        &self.visible
    }
}

struct GroupState {
    scheduler: TransitionScheduler,
    active: Option<ActiveState>,
    /// Slots touched by the running transition (exits and the enter).
    in_flight: Vec<SlotId>,
}

impl fmt::Debug for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupState")
            .field("active", &self.active)
            .field("in_flight", &self.in_flight)
            .field("pending", &self.scheduler.pending())
            .finish()
    }
}

/// Drives every group's selection and transitions.
pub struct SelectionController {
    registry: Registry,
    config: SwitcherConfig,
    groups: BTreeMap<GroupId, GroupState>,
    sink: Box<dyn DiagnosticSink>,
}

impl fmt::Debug for SelectionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("registry", &self.registry)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl SelectionController {
    /// Take ownership of `registry` and snap every slot hidden.
    ///
    /// No slot is selected until [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(
        registry: Registry,
        config: SwitcherConfig,
        sink: impl DiagnosticSink + 'static,
    ) -> Self {
        let timing = config.timing();
        let groups = registry
            .groups()
            .enumerate()
            .map(|(index, group)| {
                for slot in group.slots() {
                    for root in slot.roots() {
                        root.set_visual_state(VisualState::HIDDEN);
                    }
                }
                let state = GroupState {
                    scheduler: TransitionScheduler::new(
                        timing,
                        config.scramble_for_group(index),
                    ),
                    active: None,
                    in_flight: Vec::new(),
                };
                (group.id().clone(), state)
            })
            .collect();
        Self {
            registry,
            config,
            groups,
            sink: Box::new(sink),
        }
    }

    /// Discover bindings from `source` and build a controller that reports
    /// lookup failures through `tracing`.
    #[must_use]
    pub fn from_discovery<D: Discovery + ?Sized>(source: &D, config: SwitcherConfig) -> Self {
        Self::new(Registry::discover(source), config, TracingSink)
    }

    /// Select each group's default slot (the first trigger that resolves).
    pub fn initialize(&mut self) {
        let defaults: Vec<(GroupId, SlotId)> = self
            .registry
            .groups()
            .filter_map(|g| g.default_slot().map(|s| (g.id().clone(), s.id().clone())))
            .collect();
        for (group, slot) in defaults {
            self.begin(&group, &slot);
        }
    }

    /// Make `slot` the only visible slot of `group`.
    ///
    /// Unknown ids are reported to the sink and change nothing.
    pub fn select(&mut self, group: &GroupId, slot: &SlotId) -> Result<(), LookupError> {
        if let Err(err) = self.registry.lookup(group, slot) {
            tracing::debug!(group = %group, slot = %slot, "select ignored");
            self.sink.report(&err);
            return Err(err);
        }
        self.begin(group, slot);
        Ok(())
    }

    /// Issue the select a trigger is bound to.
    pub fn activate(&mut self, trigger: &Trigger) -> Result<(), LookupError> {
        self.select(&trigger.group, &trigger.slot)
    }

    fn begin(&mut self, group_id: &GroupId, slot_id: &SlotId) {
        let Some(group) = self.registry.group(group_id) else {
            return;
        };
        let Some(target) = group.slot(slot_id) else {
            return;
        };
        let Some(state) = self.groups.get_mut(group_id) else {
            return;
        };

        let (from, mut visible) = match state.active.take() {
            Some(active) => (Some(active.phase.slot().clone()), active.visible),
            None => (None, Vec::new()),
        };

        // Interrupt: snap everything still moving hidden before rescheduling.
        // Text regions are only driven (and later re-shown) by reveals.
        let scramble = self.config.scramble_on_enter;
        for id in state.in_flight.drain(..) {
            if let Some(slot) = group.slot(&id) {
                for root in slot.roots() {
                    state.scheduler.cancel_all(root);
                }
                if scramble {
                    for region in slot.text_regions() {
                        state.scheduler.cancel_all(&region.element);
                    }
                }
            }
            visible.retain(|v| *v != id);
        }

        let exits: Vec<&Slot> = visible
            .iter()
            .filter(|v| *v != slot_id)
            .filter_map(|v| group.slot(v))
            .collect();
        for exit in &exits {
            state.scheduler.add(
                TransitionEntry::hide(exit.roots().to_vec()).start(StartOffset::immediately()),
            );
        }

        let start = if exits.is_empty() {
            StartOffset::immediately()
        } else {
            self.config.enter_start()
        };
        let mut show = TransitionEntry::show(target.roots().to_vec()).start(start);
        if self.config.scramble_on_enter {
            for region in target.text_regions() {
                show = show.with_reveal(region.element.clone(), region.text.clone());
            }
        }
        state.scheduler.add(show);

        tracing::debug!(
            group = %group_id,
            from = from.as_ref().map(SlotId::as_str),
            to = %slot_id,
            exits = exits.len(),
            "selection scheduled"
        );

        state.in_flight = exits.iter().map(|s| s.id().clone()).collect();
        state.in_flight.push(slot_id.clone());
        state.active = Some(ActiveState {
            phase: GroupPhase::Transitioning {
                from,
                to: slot_id.clone(),
            },
            visible: state.in_flight.clone(),
        });
    }

    /// Advance every group by one frame of `dt`.
    pub fn tick(&mut self, dt: Duration) {
        for (id, state) in &mut self.groups {
            state.scheduler.tick(dt);
            let Some(active) = state.active.as_mut() else {
                continue;
            };
            if active.phase.is_settled() || !state.scheduler.is_idle() {
                continue;
            }
            let slot = active.phase.slot().clone();
            tracing::debug!(group = %id, slot = %slot, "selection settled");
            active.visible = vec![slot.clone()];
            active.phase = GroupPhase::Settled(slot);
            state.in_flight.clear();
        }
    }

    /// Selection record for `group`, once initialized.
    #[must_use]
    pub fn active(&self, group: &GroupId) -> Option<&ActiveState> {
        self.groups.get(group)?.active.as_ref()
    }

    #[must_use]
    pub fn active_slot(&self, group: &GroupId) -> Option<&SlotId> {
        self.active(group).map(ActiveState::slot)
    }

    #[must_use]
    pub fn phase(&self, group: &GroupId) -> Option<&GroupPhase> {
        self.active(group).map(ActiveState::phase)
    }

    #[must_use]
    pub fn visible_slots(&self, group: &GroupId) -> &[SlotId] {
        match self.active(group) {
            Some(active) => active.visible(),
            None => &[],
        }
    }

    /// No group has a transition in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.groups.values().all(|s| {
            s.scheduler.is_idle() && s.active.as_ref().is_none_or(|a| a.phase.is_settled())
        })
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &SwitcherConfig {
        &self.config
    }

    /// Every registered trigger, including ones with no bound slot.
    #[must_use]
    pub fn triggers(&self) -> Vec<Trigger> {
        self.registry.triggers()
    }
}
