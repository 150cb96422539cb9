pub mod timestamped;

pub use timestamped::{Timestamped, Ts};
