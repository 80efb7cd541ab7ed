//! Daily schedule: pick a mode by local time of day

use chrono::Timelike;
use heapless::Vec;

use super::{Mode, ModeError, ModeKind, ModeParams, Rendered};
use crate::config::{ScheduleEntry, MAX_SCHEDULE_ENTRIES};
use crate::context::Context;

#[derive(Debug)]
pub struct DailyMode {
    schedule: Vec<ScheduleEntry, MAX_SCHEDULE_ENTRIES>,
}

impl DailyMode {
    pub fn new(schedule: Vec<ScheduleEntry, MAX_SCHEDULE_ENTRIES>) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }
}

/// Slot in effect at `minute_of_day`
///
/// That is the slot with the latest start at or before `minute_of_day`.
/// Before the first slot of the day the last slot of the previous day is
/// still running. On equal start times the later slot in the list wins.
pub fn select(schedule: &[ScheduleEntry], minute_of_day: u16) -> Option<&ScheduleEntry> {
    let latest = |best: Option<&ScheduleEntry>, slot: &ScheduleEntry| -> bool {
        best.map_or(true, |b| slot.minute_of_day >= b.minute_of_day)
    };

    let mut started: Option<&ScheduleEntry> = None;
    let mut last_of_day: Option<&ScheduleEntry> = None;
    for slot in schedule {
        if slot.minute_of_day <= minute_of_day && latest(started, slot) {
            started = Some(slot);
        }
        if latest(last_of_day, slot) {
            last_of_day = Some(slot);
        }
    }
    started.or(last_of_day)
}

impl Mode for DailyMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Daily
    }

    fn render(
        &mut self,
        ctx: &mut Context<'_>,
        _params: &ModeParams,
    ) -> Result<Rendered, ModeError> {
        let now = ctx.local_time();
        let minute_of_day = (now.hour() * 60 + now.minute()) as u16;

        match select(&self.schedule, minute_of_day) {
            Some(slot) => Ok(Rendered::Delegate(slot.entry.clone())),
            None => {
                ctx.log("Daily mode schedule is empty");
                Ok(Rendered::Idle)
            }
        }
    }
}
