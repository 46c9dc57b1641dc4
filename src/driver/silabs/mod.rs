pub mod si7021;
