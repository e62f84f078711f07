pub mod callback_reader;
pub mod verdict_writer;
