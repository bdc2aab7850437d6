pub mod campaign_writer;
pub mod submission_reader;
