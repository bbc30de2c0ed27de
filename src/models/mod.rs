pub mod chronos;
