use crate::bus_types::ref_bus;
use crate::error::Result;
use crate::math::J;
use crate::mpopt::SlackBus;
use crate::order::{BusOrder, Topology};
use crate::total_load::{total_load, LoadZone};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Case is a radial network description as read from the input files.
#[derive(Clone, Debug, Default)]
pub struct Case {
    pub name: String,

    /// Network nodes with their static loads.
    pub bus: Vec<Bus>,

    /// Lines/cables, each directed from the upstream to the downstream bus.
    pub line: Vec<Line>,
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BusType {
    /// Fixed active and reactive power.
    PQ = 1,
    /// Fixed voltage magnitude and active power.
    PV = 2,
    /// Reference voltage angle. Slack active and reactive power.
    REF = 3,
    /// Isolated bus.
    NONE = 4,
}

impl TryFrom<u8> for BusType {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            1 => Ok(BusType::PQ),
            2 => Ok(BusType::PV),
            3 => Ok(BusType::REF),
            4 => Ok(BusType::NONE),
            _ => Err(format!("invalid bus type code {}", code)),
        }
    }
}

impl From<BusType> for u8 {
    fn from(bus_type: BusType) -> Self {
        bus_type as u8
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BusType::PQ => "PQ",
            BusType::PV => "PV",
            BusType::REF => "REF",
            BusType::NONE => "NONE",
        };
        f.write_str(s)
    }
}

/// Bus is a node in the radial network. Fields are in input column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    /// Bus number.
    pub bus_i: usize,

    pub bus_type: BusType,

    /// Real power generation. Not modelled by the sweep.
    pub pg: f64,

    /// Reactive power generation. Not modelled by the sweep.
    pub qg: f64,

    /// Real power demand.
    pub pd: f64,

    /// Reactive power demand.
    pub qd: f64,

    /// Voltage magnitude (p.u.). The sweep always uses a flat start.
    pub vm: f64,

    /// Voltage angle (degrees).
    pub va: f64,
}

impl Bus {
    /// Complex load power `pd + j*qd`.
    pub fn s_load(&self) -> Complex64 {
        self.pd + J * self.qd
    }

    pub fn is_ref(&self) -> bool {
        self.bus_type == BusType::REF
    }

    pub fn is_pv(&self) -> bool {
        self.bus_type == BusType::PV
    }
}

/// Line is a branch of the radial network. Fields are in input column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// From (upstream) bus number.
    pub from_bus: usize,

    /// To (downstream) bus number.
    pub to_bus: usize,

    /// Resistance.
    pub r: f64,

    /// Reactance.
    pub x: f64,

    /// Shunt susceptance. Shunt effects are ignored.
    pub b: f64,
}

impl Line {
    /// Series impedance `r + j*x`.
    pub fn z(&self) -> Complex64 {
        self.r + J * self.x
    }
}

/// Network is a validated radial network with internal (0-based) bus
/// indexing, ready to be solved. It is not modified by the solver.
#[derive(Clone, Debug)]
pub struct Network {
    pub bus: Vec<Bus>,
    pub line: Vec<Line>,

    pub order: BusOrder,
    pub topology: Topology,

    /// Internal index of the slack bus.
    pub slack: usize,

    s_load: Vec<Complex64>,
    z: Vec<Complex64>,
}

impl Network {
    /// Builds the network model, checking that the lines form a single tree
    /// rooted at the slack bus.
    pub fn new(case: &Case, slack: SlackBus) -> Result<Self> {
        let order = BusOrder::new(&case.bus)?;
        let slack = ref_bus(&case.bus, &order, slack)?;
        let topology = Topology::new(&order, &case.line, slack)?;

        let s_load = total_load(&case.bus, LoadZone::Bus);
        let z = case.line.iter().map(|l| l.z()).collect();

        log::debug!(
            "network {:?}: {} buses, {} lines, slack bus {}",
            case.name,
            case.bus.len(),
            case.line.len(),
            order.i2e[slack]
        );

        Ok(Self {
            bus: case.bus.clone(),
            line: case.line.clone(),
            order,
            topology,
            slack,
            s_load,
            z,
        })
    }

    pub fn nb(&self) -> usize {
        self.bus.len()
    }

    pub fn nl(&self) -> usize {
        self.line.len()
    }

    /// Complex load power of each bus.
    pub fn s_load(&self) -> &[Complex64] {
        &self.s_load
    }

    /// Series impedance of each line.
    pub fn z(&self) -> &[Complex64] {
        &self.z
    }

    /// True if no line leaves the downstream end of line `l`.
    pub fn is_leaf(&self, l: usize) -> bool {
        self.topology.is_leaf(l)
    }

    /// Lines leaving bus `b` (internal index).
    pub fn children(&self, b: usize) -> &[usize] {
        &self.topology.children[b]
    }

    /// Lines leaving the slack bus.
    pub fn root_lines(&self) -> &[usize] {
        self.children(self.slack)
    }
}
