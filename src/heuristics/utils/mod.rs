pub mod set_vec;
