pub mod join_code;
