pub mod qc_stats;
