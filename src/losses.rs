use crate::network::Network;
use crate::polar::power_vec;
use crate::radial::SweepState;
use crate::total_load::{total_load, LoadZone};

use num_complex::Complex64;

/// Complex power dissipated in each line, `|I|^2 * Z`. The real part is the
/// active loss.
pub fn branch_losses(net: &Network, i_line: &[Complex64]) -> Vec<Complex64> {
    power_vec(i_line, net.z())
}

/// Total active power loss of all lines.
pub fn total_losses(net: &Network, i_line: &[Complex64]) -> f64 {
    branch_losses(net, i_line).iter().map(|s| s.re).sum()
}

/// Complex power delivered by the slack bus: the power into every line
/// leaving it plus its own load.
pub fn input_power(net: &Network, state: &SweepState) -> Complex64 {
    let s = net.slack;
    let i_in = net
        .root_lines()
        .iter()
        .fold(state.i_load[s], |sum, &l| sum + state.i_line[l]);
    state.v[s] * i_in.conj()
}

/// Power balance of a solved network, in p.u.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PowerBalance {
    /// Power supplied at the slack bus.
    pub s_in: Complex64,
    /// Total load.
    pub s_load: Complex64,
    /// Total line losses.
    pub losses: Complex64,
}

impl PowerBalance {
    pub fn new(net: &Network, state: &SweepState) -> Self {
        let s_load = total_load(&net.bus, LoadZone::All)[0];
        let losses = branch_losses(net, &state.i_line).iter().sum();
        Self {
            s_in: input_power(net, state),
            s_load,
            losses,
        }
    }

    /// Total active line loss.
    pub fn p_loss(&self) -> f64 {
        self.losses.re
    }

    /// Load plus losses.
    pub fn s_out(&self) -> Complex64 {
        self.s_load + self.losses
    }

    /// Magnitude of the difference between supplied and consumed power.
    pub fn mismatch(&self) -> f64 {
        (self.s_out() - self.s_in).norm()
    }
}
