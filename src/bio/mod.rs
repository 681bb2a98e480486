pub mod fasta;

pub use fasta::{strip_gaps, write_unaligned};
