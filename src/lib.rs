#[macro_use]
pub mod math;

mod bus_types;
mod error;
mod loadcase;
mod losses;
mod mpopt;
mod network;
mod order;
mod pf;
mod radial;
mod total_load;

pub mod polar;
pub mod printpf;

pub use bus_types::*;
pub use error::*;
pub use loadcase::*;
pub use losses::*;
pub use mpopt::*;
pub use network::*;
pub use order::*;
pub use pf::*;
pub use radial::*;
pub use total_load::*;

#[cfg(test)]
mod tests;
