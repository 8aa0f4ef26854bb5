//! Result file output

mod json_result_writer;

pub use json_result_writer::JsonResultWriter;
