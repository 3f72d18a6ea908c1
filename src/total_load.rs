use crate::network::Bus;
use num_complex::Complex64;

#[derive(PartialEq)]
pub enum LoadZone {
    /// Use a single zone for the entire system.
    All = 1,
    /// Use a different zone for each bus.
    Bus = 2,
}

/// Returns vector of total complex load in each load zone.
///
/// `LoadZone::All` returns a single element, `LoadZone::Bus` one element per
/// bus in input order.
pub fn total_load(bus: &[Bus], load_zone: LoadZone) -> Vec<Complex64> {
    match load_zone {
        LoadZone::Bus => bus.iter().map(|b| b.s_load()).collect(),
        LoadZone::All => vec![bus.iter().map(|b| b.s_load()).sum()],
    }
}
