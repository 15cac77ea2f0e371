#![allow(non_snake_case)]
/// CSV export of sampled curves and solver traces.
pub mod csv_out;
