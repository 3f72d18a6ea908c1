use crate::error::{RadialError, Result};
use crate::network::{Bus, Line};
use std::collections::{HashMap, VecDeque};

/// Mapping between external bus numbers and internal (0-based, input order)
/// bus indexes.
#[derive(Clone, Debug)]
pub struct BusOrder {
    pub e2i: HashMap<usize, usize>,
    pub i2e: Vec<usize>,
}

impl BusOrder {
    pub(crate) fn new(bus: &[Bus]) -> Result<Self> {
        if bus.is_empty() {
            return Err(RadialError::EmptyNetwork);
        }
        let mut e2i = HashMap::with_capacity(bus.len());
        let mut i2e = Vec::with_capacity(bus.len());
        for (i, b) in bus.iter().enumerate() {
            if e2i.insert(b.bus_i, i).is_some() {
                return Err(RadialError::DuplicateBus(b.bus_i));
            }
            i2e.push(b.bus_i);
        }
        Ok(Self { e2i, i2e })
    }

    /// Internal index of external bus number `bus_i`.
    pub fn internal(&self, bus_i: usize) -> Option<usize> {
        self.e2i.get(&bus_i).copied()
    }
}

/// Parent/child structure of a radial network, in internal bus indexing.
#[derive(Clone, Debug)]
pub struct Topology {
    /// Upstream bus of each line.
    pub f: Vec<usize>,
    /// Downstream bus of each line.
    pub t: Vec<usize>,

    /// Line feeding each bus (`None` for the slack bus).
    pub parent: Vec<Option<usize>>,
    /// Lines leaving each bus, in input order.
    pub children: Vec<Vec<usize>>,

    /// Lines ordered so that every line comes after the line feeding its
    /// upstream bus.
    pub forward: Vec<usize>,
}

impl Topology {
    /// Derives the tree structure from the line endpoints.
    ///
    /// Fails unless every bus other than `slack` is fed by exactly one line
    /// and can be reached from `slack`.
    pub(crate) fn new(order: &BusOrder, line: &[Line], slack: usize) -> Result<Self> {
        let nb = order.i2e.len();
        let nl = line.len();

        let mut f = Vec::with_capacity(nl);
        let mut t = Vec::with_capacity(nl);
        let mut parent: Vec<Option<usize>> = vec![None; nb];
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nb];

        for (l, ln) in line.iter().enumerate() {
            let fi = order.internal(ln.from_bus).ok_or(RadialError::UnknownBus {
                line: l,
                bus: ln.from_bus,
            })?;
            let ti = order.internal(ln.to_bus).ok_or(RadialError::UnknownBus {
                line: l,
                bus: ln.to_bus,
            })?;
            if fi == ti {
                return Err(RadialError::SelfLoop {
                    line: l,
                    bus: ln.from_bus,
                });
            }
            if ti == slack {
                return Err(RadialError::SlackHasParent {
                    bus: ln.to_bus,
                    line: l,
                });
            }
            if let Some(first) = parent[ti] {
                return Err(RadialError::MultipleParents {
                    bus: ln.to_bus,
                    first,
                    second: l,
                });
            }
            parent[ti] = Some(l);
            children[fi].push(l);
            f.push(fi);
            t.push(ti);
        }

        // breadth-first from the slack bus
        let mut forward = Vec::with_capacity(nl);
        let mut visited = vec![false; nb];
        let mut queue = VecDeque::from([slack]);
        visited[slack] = true;
        while let Some(b) = queue.pop_front() {
            for &l in &children[b] {
                forward.push(l);
                visited[t[l]] = true;
                queue.push_back(t[l]);
            }
        }

        if let Some(b) = visited.iter().position(|&v| !v) {
            return Err(RadialError::Unreachable(order.i2e[b]));
        }
        // every bus reached exactly once through its single parent
        debug_assert_eq!(forward.len(), nl);

        Ok(Self {
            f,
            t,
            parent,
            children,
            forward,
        })
    }

    /// True if no line leaves the downstream bus of line `l`.
    pub fn is_leaf(&self, l: usize) -> bool {
        self.children[self.t[l]].is_empty()
    }

    /// Lines ordered leaves first, each line before the line feeding it.
    pub fn backward(&self) -> impl Iterator<Item = usize> + '_ {
        self.forward.iter().rev().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::BusType;
    use crate::tests::{bus, line};

    fn buses(n: usize) -> Vec<Bus> {
        (1..=n)
            .map(|i| {
                let bus_type = if i == 1 { BusType::REF } else { BusType::PQ };
                bus(i, bus_type, 0.0, 0.0)
            })
            .collect()
    }

    #[test]
    fn forward_order_ignores_input_order() -> anyhow::Result<()> {
        let bus = buses(4);
        let order = BusOrder::new(&bus)?;
        // leaf-first input order
        let line = vec![line(3, 4, 0.1, 0.1), line(2, 3, 0.1, 0.1), line(1, 2, 0.1, 0.1)];
        let topo = Topology::new(&order, &line, 0)?;

        assert_eq!(topo.forward, vec![2, 1, 0]);
        assert_eq!(topo.backward().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(topo.parent, vec![None, Some(2), Some(1), Some(0)]);
        assert!(topo.is_leaf(0));
        assert!(!topo.is_leaf(2));
        Ok(())
    }

    #[test]
    fn parents_precede_children() -> anyhow::Result<()> {
        let bus = buses(6);
        let order = BusOrder::new(&bus)?;
        let line = vec![
            line(4, 6, 0.1, 0.1),
            line(2, 5, 0.1, 0.1),
            line(1, 2, 0.1, 0.1),
            line(2, 4, 0.1, 0.1),
            line(1, 3, 0.1, 0.1),
        ];
        let topo = Topology::new(&order, &line, 0)?;

        let pos = |l: usize| topo.forward.iter().position(|&x| x == l);
        for l in 0..line.len() {
            if let Some(p) = topo.parent[topo.f[l]] {
                assert!(pos(p) < pos(l), "line {} must follow line {}", l, p);
            }
        }
        Ok(())
    }

    #[test]
    fn duplicate_bus() {
        let mut bus = buses(3);
        bus[2].bus_i = 2;
        assert_eq!(BusOrder::new(&bus).err(), Some(RadialError::DuplicateBus(2)));
    }

    #[test]
    fn empty_network() {
        assert_eq!(BusOrder::new(&[]).err(), Some(RadialError::EmptyNetwork));
    }

    #[test]
    fn structural_errors() -> anyhow::Result<()> {
        let bus = buses(4);
        let order = BusOrder::new(&bus)?;

        let err = Topology::new(&order, &[line(1, 7, 0.1, 0.1)], 0).err();
        assert_eq!(err, Some(RadialError::UnknownBus { line: 0, bus: 7 }));

        let err = Topology::new(&order, &[line(2, 2, 0.1, 0.1)], 0).err();
        assert_eq!(err, Some(RadialError::SelfLoop { line: 0, bus: 2 }));

        let err = Topology::new(&order, &[line(2, 1, 0.1, 0.1)], 0).err();
        assert_eq!(err, Some(RadialError::SlackHasParent { bus: 1, line: 0 }));

        let lines = [line(1, 2, 0.1, 0.1), line(1, 3, 0.1, 0.1), line(2, 3, 0.1, 0.1)];
        let err = Topology::new(&order, &lines, 0).err();
        assert_eq!(
            err,
            Some(RadialError::MultipleParents {
                bus: 3,
                first: 1,
                second: 2
            })
        );

        // bus 4 isolated
        let lines = [line(1, 2, 0.1, 0.1), line(2, 3, 0.1, 0.1)];
        let err = Topology::new(&order, &lines, 0).err();
        assert_eq!(err, Some(RadialError::Unreachable(4)));

        // 3 -> 4 -> 3 loop detached from the slack
        let lines = [line(1, 2, 0.1, 0.1), line(3, 4, 0.1, 0.1), line(4, 3, 0.1, 0.1)];
        let err = Topology::new(&order, &lines, 0).err();
        assert_eq!(err, Some(RadialError::Unreachable(3)));
        Ok(())
    }
}
