//! Benchmark crate for scanform. See `benches/`.
