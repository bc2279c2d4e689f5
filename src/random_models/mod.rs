pub mod gnp;
