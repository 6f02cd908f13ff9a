//! Price multipliers from world events.

use sim_core::{ActiveEvent, Day, Good, SystemId};

/// Multiplier one event applies to `good` at `system` on `day`.
///
/// 1.0 when the event targets another system, is outside its day range,
/// or does not list the good.
pub fn event_modifier(event: &ActiveEvent, system: SystemId, good: Good, day: Day) -> f64 {
    if !event.applies_to(system, day) {
        return 1.0;
    }
    event.modifiers.get(&good).copied().unwrap_or(1.0)
}

/// Product of every qualifying event's multiplier.
///
/// Overlapping events compound: a strike (x1.5) during a shortage (x1.2)
/// yields x1.8.
pub fn combined_event_modifier(
    events: &[ActiveEvent],
    system: SystemId,
    good: Good,
    day: Day,
) -> f64 {
    events
        .iter()
        .map(|e| event_modifier(e, system, good, day))
        .product()
}

/// Events affecting `system` on `day`, in input order.
pub fn events_at<'a>(
    events: &'a [ActiveEvent],
    system: SystemId,
    day: Day,
) -> impl Iterator<Item = &'a ActiveEvent> + 'a {
    events.iter().filter(move |e| e.applies_to(system, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::EventKind;
    use std::collections::BTreeMap;

    fn ev(id: &str, system: u32, days: (Day, Day), mods: &[(Good, f64)]) -> ActiveEvent {
        ActiveEvent {
            id: id.into(),
            kind: EventKind::Strike,
            system_id: SystemId(system),
            start_day: days.0,
            end_day: days.1,
            modifiers: mods.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn no_events_is_neutral() {
        assert_eq!(combined_event_modifier(&[], SystemId(1), Good::Ore, 3), 1.0);
    }

    #[test]
    fn filters_by_system_day_and_good() {
        let e = ev("strike", 1, (10, 12), &[(Good::Ore, 1.5)]);
        assert_eq!(event_modifier(&e, SystemId(1), Good::Ore, 11), 1.5);
        assert_eq!(event_modifier(&e, SystemId(1), Good::Ore, 9), 1.0);
        assert_eq!(event_modifier(&e, SystemId(1), Good::Ore, 13), 1.0);
        assert_eq!(event_modifier(&e, SystemId(2), Good::Ore, 11), 1.0);
        assert_eq!(event_modifier(&e, SystemId(1), Good::Grain, 11), 1.0);
    }

    #[test]
    fn overlapping_events_multiply() {
        let events = vec![
            ev("strike", 1, (0, 5), &[(Good::Ore, 1.5)]),
            ev("shortage", 1, (3, 9), &[(Good::Ore, 1.2), (Good::Fuel, 2.0)]),
            ev("festival", 2, (0, 9), &[(Good::Ore, 0.5)]),
        ];
        let m = combined_event_modifier(&events, SystemId(1), Good::Ore, 4);
        assert!((m - 1.8).abs() < 1e-12);
        assert_eq!(combined_event_modifier(&events, SystemId(1), Good::Ore, 1), 1.5);
        assert_eq!(events_at(&events, SystemId(1), 4).count(), 2);
    }
}
