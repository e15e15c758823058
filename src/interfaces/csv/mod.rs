pub mod action_reader;
pub mod summary_writer;
