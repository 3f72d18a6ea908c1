use crate::error::{RadialError, Result};
use crate::mpopt::SlackBus;
use crate::network::Bus;
use crate::order::BusOrder;

/// Selects the slack (reference) bus and returns its internal index.
///
/// With `SlackBus::ByType` exactly one bus must be of type REF. PV buses have
/// no voltage control in a radial sweep and are solved as load buses.
pub fn ref_bus(bus: &[Bus], order: &BusOrder, slack: SlackBus) -> Result<usize> {
    let pv = bus
        .iter()
        .filter(|b| b.is_pv())
        .map(|b| b.bus_i)
        .collect::<Vec<usize>>();
    if !pv.is_empty() {
        log::warn!("PV buses {:?} are solved as PQ buses", pv);
    }

    match slack {
        SlackBus::Bus(bus_i) => order
            .internal(bus_i)
            .ok_or(RadialError::UnknownSlackBus(bus_i)),
        SlackBus::ByType => {
            let refbus = bus
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_ref())
                .map(|(i, _)| i)
                .collect::<Vec<usize>>();
            match refbus.as_slice() {
                [] => Err(RadialError::NoSlackBus),
                [i] => Ok(*i),
                _ => Err(RadialError::MultipleSlackBuses(
                    refbus.iter().map(|&i| bus[i].bus_i).collect(),
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::BusType;
    use crate::tests::bus;

    #[test]
    fn slack_by_type_at_any_position() -> anyhow::Result<()> {
        let bus = vec![
            bus(10, BusType::PQ, 0.1, 0.0),
            bus(20, BusType::REF, 0.0, 0.0),
            bus(30, BusType::PQ, 0.1, 0.0),
        ];
        let order = BusOrder::new(&bus)?;
        assert_eq!(ref_bus(&bus, &order, SlackBus::ByType)?, 1);
        Ok(())
    }

    #[test]
    fn slack_must_be_unique() -> anyhow::Result<()> {
        let mut bus = vec![
            bus(1, BusType::REF, 0.0, 0.0),
            bus(2, BusType::REF, 0.0, 0.0),
            bus(3, BusType::PQ, 0.1, 0.0),
        ];
        let order = BusOrder::new(&bus)?;
        assert_eq!(
            ref_bus(&bus, &order, SlackBus::ByType),
            Err(RadialError::MultipleSlackBuses(vec![1, 2]))
        );

        bus.iter_mut().for_each(|b| b.bus_type = BusType::PQ);
        assert_eq!(
            ref_bus(&bus, &order, SlackBus::ByType),
            Err(RadialError::NoSlackBus)
        );
        Ok(())
    }

    #[test]
    fn explicit_slack_overrides_type() -> anyhow::Result<()> {
        let bus = vec![bus(1, BusType::PQ, 0.0, 0.0), bus(2, BusType::PQ, 0.1, 0.0)];
        let order = BusOrder::new(&bus)?;
        assert_eq!(ref_bus(&bus, &order, SlackBus::Bus(1))?, 0);
        assert_eq!(
            ref_bus(&bus, &order, SlackBus::Bus(9)),
            Err(RadialError::UnknownSlackBus(9))
        );
        Ok(())
    }
}
