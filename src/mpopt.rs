use derive_builder::Builder;

/// Slack bus selection.
#[derive(Debug, PartialEq, Copy, Clone, Default)]
pub enum SlackBus {
    /// The single bus of type REF.
    #[default]
    ByType,
    /// The bus with this external number, regardless of bus types.
    Bus(usize),
}

/// Power flow options.
#[derive(Debug, Clone, Builder)]
#[builder(default, build_fn(validate = "Self::validate"))]
pub struct PFOpt {
    /// Maximum number of sweep iterations. Default value is 200.
    pub max_it: usize,

    /// Termination tolerance on the largest bus voltage change between
    /// iterations (p.u.). Default value is 1e-6.
    pub tolerance: f64,

    /// Power base (MVA) used to scale reported powers. Default value is 1.
    pub base_mva: f64,

    /// Voltage base (kV) of the feeder, reported only. Default value is 12.66.
    pub base_kv: f64,

    /// Smallest bus voltage magnitude (p.u.) accepted before the sweep is
    /// aborted as numerically unstable. Default value is 1e-6.
    pub min_voltage: f64,

    pub slack: SlackBus,
}

impl Default for PFOpt {
    fn default() -> Self {
        Self {
            max_it: 200,
            tolerance: 1e-6,
            base_mva: 1.0,
            base_kv: 12.66,
            min_voltage: 1e-6,
            slack: SlackBus::ByType,
        }
    }
}

impl PFOptBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.max_it == Some(0) {
            return Err("max_it must be at least 1".to_string());
        }
        if let Some(tol) = self.tolerance {
            if !(tol >= 0.0) {
                return Err(format!("tolerance ({}) must be non-negative", tol));
            }
        }
        if let Some(base_mva) = self.base_mva {
            if !(base_mva > 0.0) {
                return Err(format!("base_mva ({}) must be positive", base_mva));
            }
        }
        if let Some(base_kv) = self.base_kv {
            if !(base_kv > 0.0) {
                return Err(format!("base_kv ({}) must be positive", base_kv));
            }
        }
        if let Some(vmin) = self.min_voltage {
            if !(vmin >= 0.0) {
                return Err(format!("min_voltage ({}) must be non-negative", vmin));
            }
        }
        Ok(())
    }
}
