mod sweep;

use crate::network::{Bus, BusType, Case, Line};
use proptest::prelude::*;

pub(crate) fn bus(bus_i: usize, bus_type: BusType, pd: f64, qd: f64) -> Bus {
    Bus {
        bus_i,
        bus_type,
        pg: 0.0,
        qg: 0.0,
        pd,
        qd,
        vm: 1.0,
        va: 0.0,
    }
}

pub(crate) fn line(from_bus: usize, to_bus: usize, r: f64, x: f64) -> Line {
    Line {
        from_bus,
        to_bus,
        r,
        x,
        b: 0.0,
    }
}

pub(crate) fn case(bus: Vec<Bus>, line: Vec<Line>) -> Case {
    Case {
        name: "test".to_string(),
        bus,
        line,
    }
}

/// Slack bus 1 feeding a load `p + jq` at bus 2 through `r + jx`.
pub(crate) fn two_bus_case(r: f64, x: f64, p: f64, q: f64) -> Case {
    case(
        vec![bus(1, BusType::REF, 0.0, 0.0), bus(2, BusType::PQ, p, q)],
        vec![line(1, 2, r, x)],
    )
}

/// `n` buses in series, every load bus drawing `p + jq`.
pub(crate) fn chain_case(n: usize, r: f64, x: f64, p: f64, q: f64) -> Case {
    let bus = (1..=n)
        .map(|i| match i {
            1 => bus(i, BusType::REF, 0.0, 0.0),
            _ => bus(i, BusType::PQ, p, q),
        })
        .collect();
    let line = (1..n).map(|i| line(i, i + 1, r, x)).collect();
    case(bus, line)
}

/// Eight bus feeder with two laterals.
///
/// ```txt
/// 1 - 2 - 3 - 4 - 5
///         |    \
///         6     7 - 8
/// ```
pub(crate) fn feeder_case() -> Case {
    case(
        vec![
            bus(1, BusType::REF, 0.0, 0.0),
            bus(2, BusType::PQ, 0.10, 0.06),
            bus(3, BusType::PQ, 0.09, 0.04),
            bus(4, BusType::PQ, 0.12, 0.08),
            bus(5, BusType::PQ, 0.06, 0.03),
            bus(6, BusType::PQ, 0.06, 0.02),
            bus(7, BusType::PQ, 0.20, 0.10),
            bus(8, BusType::PQ, 0.06, 0.02),
        ],
        vec![
            line(1, 2, 0.00922, 0.00470),
            line(2, 3, 0.04930, 0.02511),
            line(3, 4, 0.03660, 0.01864),
            line(4, 5, 0.03811, 0.01941),
            line(3, 6, 0.08190, 0.07070),
            line(4, 7, 0.01872, 0.06188),
            line(7, 8, 0.07114, 0.02351),
        ],
    )
}

/// Random radial networks with light loads: bus `i` is fed from a random
/// earlier bus, lines are listed in random order.
pub(crate) fn radial_case() -> impl Strategy<Value = Case> {
    (2usize..12)
        .prop_flat_map(|n| {
            let parents: Vec<_> = (1..n).map(|i| 0..i).collect();
            let loads = prop::collection::vec((0.0..0.02f64, -0.005..0.02f64), n - 1);
            let impedances = prop::collection::vec((0.001..0.05f64, 0.001..0.05f64), n - 1);
            (parents, loads, impedances, Just(n))
        })
        .prop_flat_map(|(parents, loads, impedances, n)| {
            let order = Just((0..n - 1).collect::<Vec<usize>>()).prop_shuffle();
            (Just(parents), Just(loads), Just(impedances), order)
        })
        .prop_map(|(parents, loads, impedances, order)| {
            let mut bus = vec![bus(1, BusType::REF, 0.0, 0.0)];
            for (i, &(p, q)) in loads.iter().enumerate() {
                bus.push(self::bus(i + 2, BusType::PQ, p, q));
            }
            let line = order
                .iter()
                .map(|&k| {
                    let (r, x) = impedances[k];
                    self::line(parents[k] + 1, k + 2, r, x)
                })
                .collect();
            case(bus, line)
        })
}
