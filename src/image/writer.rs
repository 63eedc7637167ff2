pub mod netpbm;
