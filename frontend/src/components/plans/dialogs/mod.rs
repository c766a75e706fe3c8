pub mod new_table;
