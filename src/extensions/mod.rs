mod date_time_ext;

pub use date_time_ext::ToEpochMillis;
