pub mod seed;
pub mod storage;
